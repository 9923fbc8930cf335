pub mod validation;

pub use validation::{not_blank, ApiJson, ValidatedJson};
