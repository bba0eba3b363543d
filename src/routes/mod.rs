pub mod course;
pub mod health_checks;
pub mod me;
pub mod plans;
pub mod quiz;

pub use health_checks::*;
