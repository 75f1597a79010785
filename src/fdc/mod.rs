//! FoodData Central input handling
//!
//! Schema variant detection and nutrient accessors.

pub mod schema;

pub use schema::{
    detect_layout, FoundationAccessor, NutrientAccessor, RawNutrient, SchemaVariant, Section,
    SrLegacyAccessor,
};
