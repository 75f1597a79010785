//! Data models
//!
//! Rust structs for extracted measurements and output records.

mod nutrient;
mod record;

pub use nutrient::{Measurements, NutrientKind, NutrientMeasurement};
pub use record::CanonicalRecord;
