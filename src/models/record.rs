//! Canonical record model
//!
//! The flat, schema-independent row emitted once per food entry.

use crate::fdc::SchemaVariant;
use super::Measurements;

/// Normalized nutrition facts for one food
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    fdc_id: i64,
    alt_name: Option<String>,
    description: String,
    measurements: Measurements,
    source: SchemaVariant,
}

impl CanonicalRecord {
    pub fn new(
        fdc_id: i64,
        description: String,
        alt_name: Option<String>,
        measurements: Measurements,
        source: SchemaVariant,
    ) -> Self {
        Self {
            fdc_id,
            alt_name,
            description,
            measurements,
            source,
        }
    }

    pub fn fdc_id(&self) -> i64 {
        self.fdc_id
    }

    pub fn alt_name(&self) -> Option<&str> {
        self.alt_name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Data set the record was read from
    pub fn source(&self) -> SchemaVariant {
        self.source
    }

    pub fn weight_g(&self) -> Option<f64> {
        self.measurements.weight_g
    }

    pub fn volume_ml(&self) -> Option<f64> {
        self.measurements.volume_ml
    }

    pub fn calories_kcal(&self) -> Option<f64> {
        self.measurements.calories_kcal
    }

    pub fn fat_g(&self) -> Option<f64> {
        self.measurements.fat_g
    }

    pub fn carbs_g(&self) -> Option<f64> {
        self.measurements.carbs_g
    }

    pub fn fiber_g(&self) -> Option<f64> {
        self.measurements.fiber_g
    }

    pub fn sugars_g(&self) -> Option<f64> {
        self.measurements.sugars_g
    }

    pub fn protein_g(&self) -> Option<f64> {
        self.measurements.protein_g
    }
}
