pub mod calculator;
pub mod clients;
pub mod costs;
pub mod health;
pub mod systems;

pub use health::{health_check, metrics_endpoint, readiness_check};
