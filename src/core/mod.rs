pub mod plans;
pub mod roster;
pub mod scanner;
pub mod session;
pub mod validity;

pub use crate::domain::model::{PassStatus, PlanId, ScanResult, Student};
pub use crate::domain::ports::{Clock, FixedClock, SystemClock};
pub use crate::utils::error::Result;
