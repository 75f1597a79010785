//! Nutrient lookup
//!
//! Extracts the eight canonical quantities from one FDC food entry.
//!
//! Each macronutrient kind has an ordered list of candidate FDC nutrient
//! numbers. The first candidate with a numeric amount wins; within one
//! candidate, the first item in document order wins. Nothing here fails:
//! an unreported quantity is an absent measurement.

use serde_json::Value;

use crate::fdc::{NutrientAccessor, RawNutrient, SchemaVariant};
use crate::models::{Measurements, NutrientKind, NutrientMeasurement};
use super::portion::{reference_portion, ReferencePortion};
use super::units::{is_kilojoule, round_to_tenth, KCAL_PER_KJ, NUTRIENT_BASIS_G};

/// An acceptable upstream nutrient for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// FDC nutrient number
    pub number: &'static str,
    /// Unit assumed when the item carries no `unitName`
    pub default_unit: &'static str,
    pub label: &'static str,
}

const fn candidate(number: &'static str, default_unit: &'static str, label: &'static str) -> Candidate {
    Candidate {
        number,
        default_unit,
        label,
    }
}

const CALORIES: &[Candidate] = &[
    candidate("208", "kcal", "energy"),
    candidate("268", "kJ", "energy from kJ"),
    candidate("957", "kcal", "energy (Atwater general factors)"),
    candidate("958", "kcal", "energy (Atwater specific factors)"),
];

const FAT: &[Candidate] = &[
    candidate("204", "g", "total lipid (fat)"),
    candidate("298", "g", "total fat (NLEA)"),
];

const CARBS: &[Candidate] = &[
    candidate("205", "g", "carbohydrate, by difference"),
    candidate("205.2", "g", "carbohydrate, by summation"),
];

const FIBER: &[Candidate] = &[
    candidate("293", "g", "total dietary fiber (AOAC 2011.25)"),
    candidate("291", "g", "fiber, total dietary"),
];

const SUGARS: &[Candidate] = &[
    candidate("269.3", "g", "sugars, total"),
    candidate("269", "g", "total sugars (NLEA)"),
];

const PROTEIN: &[Candidate] = &[candidate("203", "g", "protein")];

/// Candidate nutrients for a kind, highest priority first.
///
/// Weight and volume are not nutrients and have no candidates.
pub fn candidates(kind: NutrientKind) -> &'static [Candidate] {
    match kind {
        NutrientKind::Calories => CALORIES,
        NutrientKind::Fat => FAT,
        NutrientKind::Carbs => CARBS,
        NutrientKind::Fiber => FIBER,
        NutrientKind::Sugars => SUGARS,
        NutrientKind::Protein => PROTEIN,
        NutrientKind::Weight | NutrientKind::Volume => &[],
    }
}

/// What amount of food a record's numbers describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortionBasis {
    /// The food's largest volume portion (or serving size), falling back to 100 g
    #[default]
    Portion,
    /// Always 100 g, as FDC reports nutrients
    Per100Grams,
}

impl PortionBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortionBasis::Portion => "portion",
            PortionBasis::Per100Grams => "per-100g",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "portion" => Some(PortionBasis::Portion),
            "per-100g" | "100g" => Some(PortionBasis::Per100Grams),
            _ => None,
        }
    }
}

/// Nutrient extraction for entries of one schema variant
#[derive(Clone, Copy)]
pub struct NutrientLookup {
    accessor: &'static dyn NutrientAccessor,
    basis: PortionBasis,
}

impl std::fmt::Debug for NutrientLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutrientLookup")
            .field("variant", &self.accessor.variant())
            .field("basis", &self.basis)
            .finish()
    }
}

impl NutrientLookup {
    pub fn new(variant: SchemaVariant, basis: PortionBasis) -> Self {
        Self {
            accessor: variant.accessor(),
            basis,
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.accessor.variant()
    }

    pub fn basis(&self) -> PortionBasis {
        self.basis
    }

    /// Extract one quantity from a food entry
    pub fn extract(&self, entry: &Value, kind: NutrientKind) -> NutrientMeasurement {
        let portion = reference_portion(entry);
        let nutrients = self.accessor.nutrients(entry);
        self.measure(&nutrients, &portion, kind)
    }

    /// Extract all eight quantities, resolving the portion and nutrient list once
    pub fn extract_all(&self, entry: &Value) -> Measurements {
        let portion = reference_portion(entry);
        let nutrients = self.accessor.nutrients(entry);

        let mut measurements = Measurements::default();
        for kind in NutrientKind::ALL {
            measurements.set(self.measure(&nutrients, &portion, kind));
        }
        measurements
    }

    fn measure(
        &self,
        nutrients: &[RawNutrient<'_>],
        portion: &ReferencePortion,
        kind: NutrientKind,
    ) -> NutrientMeasurement {
        let amount = match kind {
            NutrientKind::Weight => match self.basis {
                PortionBasis::Portion => Some(portion.weight_g),
                PortionBasis::Per100Grams => Some(NUTRIENT_BASIS_G),
            },
            NutrientKind::Volume => match self.basis {
                PortionBasis::Portion => portion.volume_ml,
                PortionBasis::Per100Grams => portion.volume_per_basis(),
            },
            _ => reported_amount(nutrients, kind).map(|per_basis| match self.basis {
                PortionBasis::Portion => per_basis * portion.scale_factor(),
                PortionBasis::Per100Grams => per_basis,
            }),
        };

        NutrientMeasurement::new(kind, amount.map(round_to_tenth))
    }
}

/// Amount of `kind` as reported per 100 g, in the kind's canonical unit
fn reported_amount(nutrients: &[RawNutrient<'_>], kind: NutrientKind) -> Option<f64> {
    for (priority, candidate) in candidates(kind).iter().enumerate() {
        let found = nutrients
            .iter()
            .find(|n| n.number == candidate.number && n.amount.is_some());

        if let Some(nutrient) = found {
            let amount = nutrient.amount?;
            if priority > 0 {
                tracing::debug!(
                    "{} resolved from fallback nutrient {} ({})",
                    kind,
                    candidate.number,
                    candidate.label
                );
            }

            let unit = nutrient.unit.unwrap_or(candidate.default_unit);
            if kind == NutrientKind::Calories && is_kilojoule(unit) {
                return Some(amount * KCAL_PER_KJ);
            }
            return Some(amount);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(number: &str, amount: Value, unit: &str) -> Value {
        json!({ "nutrient": { "number": number, "unitName": unit }, "amount": amount })
    }

    fn foundation() -> NutrientLookup {
        NutrientLookup::new(SchemaVariant::Foundation, PortionBasis::Portion)
    }

    #[test]
    fn test_missing_nutrient_is_absent_not_zero() {
        let entry = json!({ "foodNutrients": [item("203", json!(2.0), "g")] });
        let fiber = foundation().extract(&entry, NutrientKind::Fiber);
        assert_eq!(fiber.amount, None);
        assert_eq!(fiber.unit, "g");
    }

    #[test]
    fn test_reported_zero_is_kept() {
        let entry = json!({ "foodNutrients": [item("291", json!(0), "g")] });
        assert_eq!(foundation().extract(&entry, NutrientKind::Fiber).amount, Some(0.0));
    }

    #[test]
    fn test_candidate_priority() {
        let entry = json!({
            "foodNutrients": [
                item("298", json!(9.0), "g"),
                item("204", json!(8.0), "g"),
            ]
        });
        assert_eq!(foundation().extract(&entry, NutrientKind::Fat).amount, Some(8.0));
    }

    #[test]
    fn test_null_amount_falls_through_to_next_candidate() {
        let entry = json!({
            "foodNutrients": [
                item("205", Value::Null, "g"),
                item("205.2", json!(12.34), "g"),
            ]
        });
        assert_eq!(foundation().extract(&entry, NutrientKind::Carbs).amount, Some(12.3));
    }

    #[test]
    fn test_duplicate_first_occurrence_wins() {
        let entry = json!({
            "foodNutrients": [
                item("203", json!(1.0), "g"),
                item("203", json!(5.0), "g"),
            ]
        });
        assert_eq!(foundation().extract(&entry, NutrientKind::Protein).amount, Some(1.0));
    }

    #[test]
    fn test_kilojoules_converted() {
        let entry = json!({ "foodNutrients": [item("268", json!(1000.0), "kJ")] });
        assert_eq!(foundation().extract(&entry, NutrientKind::Calories).amount, Some(239.0));

        // Unit absent: the candidate's default unit applies
        let entry = json!({
            "foodNutrients": [{ "nutrient": { "number": "268" }, "amount": 100.0 }]
        });
        assert_eq!(foundation().extract(&entry, NutrientKind::Calories).amount, Some(23.9));
    }

    #[test]
    fn test_atwater_fallback() {
        let entry = json!({ "foodNutrients": [item("958", json!(52.0), "kcal")] });
        assert_eq!(foundation().extract(&entry, NutrientKind::Calories).amount, Some(52.0));
    }

    #[test]
    fn test_scaled_to_volume_portion() {
        let entry = json!({
            "foodNutrients": [item("203", json!(10.0), "g")],
            "foodPortions": [{
                "amount": 1.0,
                "gramWeight": 250.0,
                "measureUnit": { "id": 1000 }
            }]
        });
        let m = foundation().extract_all(&entry);
        assert_eq!(m.weight_g, Some(250.0));
        assert_eq!(m.volume_ml, Some(236.6));
        assert_eq!(m.protein_g, Some(25.0));
        assert_eq!(m.fat_g, None);
    }

    #[test]
    fn test_scaled_by_displayed_weight() {
        let entry = json!({
            "foodNutrients": [item("208", json!(900.0), "kcal")],
            "foodPortions": [{
                "amount": 1.0,
                "gramWeight": 218.04,
                "measureUnit": { "id": 1000 }
            }]
        });
        let m = foundation().extract_all(&entry);
        assert_eq!(m.weight_g, Some(218.0));
        assert_eq!(m.calories_kcal, Some(1962.0));
    }

    #[test]
    fn test_volume_only_serving_size_stays_per_100g() {
        let entry = json!({
            "dataType": "SR Legacy",
            "servingSize": 240,
            "servingSizeUnit": "ml",
            "foodNutrients": [{ "nutrientNumber": "208", "unitName": "KCAL", "value": 50 }]
        });
        let lookup = NutrientLookup::new(SchemaVariant::SrLegacy, PortionBasis::Portion);
        let m = lookup.extract_all(&entry);
        assert_eq!(m.weight_g, Some(100.0));
        assert_eq!(m.volume_ml, None);
        assert_eq!(m.calories_kcal, Some(50.0));
    }

    #[test]
    fn test_per_100g_basis() {
        let entry = json!({
            "foodNutrients": [item("203", json!(10.0), "g")],
            "foodPortions": [{
                "amount": 2.0,
                "gramWeight": 200.0,
                "measureUnit": { "id": 1004 }
            }]
        });
        let lookup = NutrientLookup::new(SchemaVariant::Foundation, PortionBasis::Per100Grams);
        let m = lookup.extract_all(&entry);
        assert_eq!(m.weight_g, Some(100.0));
        assert_eq!(m.volume_ml, Some(1.0));
        assert_eq!(m.protein_g, Some(10.0));
    }

    #[test]
    fn test_no_portion_defaults_to_100g_without_volume() {
        let entry = json!({ "foodNutrients": [item("203", json!(3.0), "g")] });
        let m = foundation().extract_all(&entry);
        assert_eq!(m.weight_g, Some(100.0));
        assert_eq!(m.volume_ml, None);
        assert_eq!(m.protein_g, Some(3.0));
    }

    #[test]
    fn test_sr_legacy_flat_shape() {
        let entry = json!({
            "foodNutrients": [
                { "nutrientNumber": "208", "unitName": "KCAL", "value": 52 },
                { "nutrientNumber": 203, "unitName": "G", "value": 0.26 }
            ]
        });
        let lookup = NutrientLookup::new(SchemaVariant::SrLegacy, PortionBasis::Portion);
        assert_eq!(lookup.extract(&entry, NutrientKind::Calories).amount, Some(52.0));
        assert_eq!(lookup.extract(&entry, NutrientKind::Protein).amount, Some(0.3));

        // The Foundation accessor does not read the flat shape
        assert_eq!(foundation().extract(&entry, NutrientKind::Calories).amount, None);
    }

    #[test]
    fn test_portion_basis_parsing() {
        assert_eq!(PortionBasis::from_str("per-100g"), Some(PortionBasis::Per100Grams));
        assert_eq!(PortionBasis::from_str("Portion"), Some(PortionBasis::Portion));
        assert_eq!(PortionBasis::from_str("serving"), None);
        assert_eq!(PortionBasis::default().as_str(), "portion");
    }

    #[test]
    fn test_weight_and_volume_have_no_candidates() {
        assert!(candidates(NutrientKind::Weight).is_empty());
        assert_eq!(candidates(NutrientKind::Calories)[0].number, "208");
    }
}
