// Domain layer: core models and ports. No dependencies beyond serde/chrono.

pub mod model;
pub mod ports;
