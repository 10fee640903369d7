pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};
pub use crate::config::{AdminConfig, AppConfig, DisplayConfig, ScannerConfig, DEFAULT_CONFIG_PATH};

pub use crate::core::plans::{catalog, compute_expiry, Plan};
pub use crate::core::roster::{Roster, RosterStats};
pub use crate::core::scanner::{camera_fixture, parse_scan_payload, PassPayload, Scanner};
pub use crate::core::session::{admin_login, RegistrationForm, Session, ViewMode};
pub use crate::core::validity::{days_remaining, is_valid, pass_status};
pub use crate::domain::model::{AdminProfile, PassStatus, PassSummary, PlanId, ScanResult, Student};
pub use crate::domain::ports::{Clock, FixedClock, SystemClock};
pub use crate::utils::error::{PassError, Result};
