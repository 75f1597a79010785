//! fdc2csv Library
//!
//! Converts USDA FoodData Central JSON exports (Foundation and SR Legacy)
//! into a flat, sorted nutrition CSV.

pub mod build_info;
pub mod error;
pub mod fdc;
pub mod models;
pub mod nutrition;
pub mod pipeline;

pub use error::{EntryError, Error, Result};
pub use models::{CanonicalRecord, Measurements, NutrientKind, NutrientMeasurement};
pub use pipeline::{run, AltNameMap, DatasetMerger, Destination, PipelineConfig};
