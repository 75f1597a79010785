//! Nutrition extraction module
//!
//! Handles nutrient lookup, reference portions and unit conversions.

pub mod lookup;
pub mod portion;
pub mod units;

pub use lookup::{candidates, Candidate, NutrientLookup, PortionBasis};
pub use portion::{reference_portion, PortionOrigin, ReferencePortion};
pub use units::{grams_per_unit, ml_per_measure_unit_id, ml_per_unit, round_to_tenth};
