pub mod client;
pub mod cost;
pub mod quote;
pub mod system;

pub use client::{Client, ClientDetails};
pub use cost::{CostRecord, StoredLineItem};
pub use quote::{
    CostResult, CostSpecification, DualModePrice, FieldMismatch, LineItem, PriceType,
    PricingMode,
};
pub use system::{System, SystemDetails, SystemType};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at BSON date precision, so a freshly built document equals
/// the one read back.
pub(crate) fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
