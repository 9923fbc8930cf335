pub mod database;
pub mod metrics;
pub mod pricing;
pub mod quotation;
pub mod repository;

pub use database::CostingDb;
pub use metrics::{get_metrics, init_metrics};
pub use pricing::{compute, PricingError};
pub use quotation::{quote, QuoteSource};
pub use repository::{CostPage, CostingRepository, DeleteSummary};
