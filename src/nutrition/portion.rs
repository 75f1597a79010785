//! Reference portion resolution
//!
//! Finds the weight and volume a food's CSV row describes. FDC reports
//! nutrients per 100 g; a food that lists a volume portion ("1 cup = 128 g")
//! is described by its largest such portion instead.

use serde::Deserialize;
use serde_json::Value;

use super::units::{
    grams_per_unit, ml_per_measure_unit_id, ml_per_unit, round_to_tenth, NUTRIENT_BASIS_G,
};

/// Where a reference portion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortionOrigin {
    /// A `foodPortions` item measured in a volume unit
    FoodPortion,
    /// The entry's `servingSize` / `servingSizeUnit` fields, in grams
    ServingSize,
    /// No portion data; the 100 g nutrient basis
    NutrientBasis,
}

/// Weight and volume of the portion a record describes.
///
/// Every portion has a gram weight, so nutrient amounts can always be
/// scaled to it. The weight is kept at the 0.1 g the CSV shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePortion {
    pub weight_g: f64,
    pub volume_ml: Option<f64>,
    pub origin: PortionOrigin,
}

impl ReferencePortion {
    /// The 100 g basis FDC nutrient amounts are reported on
    pub fn nutrient_basis() -> Self {
        Self {
            weight_g: NUTRIENT_BASIS_G,
            volume_ml: None,
            origin: PortionOrigin::NutrientBasis,
        }
    }

    /// Factor converting a per-100 g amount to this portion
    pub fn scale_factor(&self) -> f64 {
        self.weight_g / NUTRIENT_BASIS_G
    }

    /// Milliliters occupied by 100 g of the food, when the portion gives a density
    pub fn volume_per_basis(&self) -> Option<f64> {
        let volume = self.volume_ml?;
        if self.weight_g > 0.0 {
            Some(volume * NUTRIENT_BASIS_G / self.weight_g)
        } else {
            None
        }
    }
}

/// One `foodPortions` item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodPortion {
    amount: Option<f64>,
    gram_weight: Option<f64>,
    measure_unit: Option<MeasureUnit>,
    modifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeasureUnit {
    id: Option<i64>,
    name: Option<String>,
    abbreviation: Option<String>,
}

/// Resolve the reference portion for a food entry.
///
/// Order: largest volume `foodPortions` item, then a serving size given in
/// grams, then the 100 g nutrient basis. A serving size given only as a
/// volume has no weight to scale nutrients by and is ignored. Unrecognized
/// units are skipped, never an error.
pub fn reference_portion(entry: &Value) -> ReferencePortion {
    if let Some(portion) = largest_volume_portion(entry) {
        return portion;
    }

    if let Some(portion) = serving_size_portion(entry) {
        return portion;
    }

    ReferencePortion::nutrient_basis()
}

fn largest_volume_portion(entry: &Value) -> Option<ReferencePortion> {
    let portions = entry.get("foodPortions")?.as_array()?;

    let mut best: Option<(f64, f64)> = None;
    for (volume, weight) in portions.iter().filter_map(volume_portion) {
        // Strict comparison keeps the first of equal portions
        let better = match best {
            None => true,
            Some((best_volume, best_weight)) => {
                volume > best_volume || (volume == best_volume && weight > best_weight)
            }
        };
        if better {
            best = Some((volume, weight));
        }
    }

    best.map(|(volume, weight)| ReferencePortion {
        weight_g: round_to_tenth(weight),
        volume_ml: Some(volume),
        origin: PortionOrigin::FoodPortion,
    })
}

/// (volume in ml, weight in g) of a single `foodPortions` item
fn volume_portion(item: &Value) -> Option<(f64, f64)> {
    let portion = FoodPortion::deserialize(item).ok()?;
    let quantity = portion.amount?;
    let weight = portion.gram_weight?;
    if quantity <= 0.0 || weight <= 0.0 {
        return None;
    }

    let ml_per = portion.unit_ml()?;
    Some((ml_per * quantity, weight))
}

impl FoodPortion {
    /// Milliliters per unit, trying the measure unit id, its abbreviation
    /// and name, then the free-text modifier ("cup, chopped")
    fn unit_ml(&self) -> Option<f64> {
        if let Some(unit) = &self.measure_unit {
            if let Some(ml) = unit.id.and_then(ml_per_measure_unit_id) {
                return Some(ml);
            }
            for text in [&unit.abbreviation, &unit.name].into_iter().flatten() {
                if let Some(ml) = ml_per_unit(text) {
                    return Some(ml);
                }
            }
        }

        let modifier = self.modifier.as_deref()?;
        let head = modifier
            .split(|c: char| c == ',' || c == '(')
            .next()
            .unwrap_or(modifier);
        ml_per_unit(head)
    }
}

fn serving_size_portion(entry: &Value) -> Option<ReferencePortion> {
    let size = entry.get("servingSize").and_then(Value::as_f64)?;
    let unit = entry.get("servingSizeUnit").and_then(Value::as_str)?;
    if size <= 0.0 {
        return None;
    }

    grams_per_unit(unit).map(|factor| ReferencePortion {
        weight_g: round_to_tenth(size * factor),
        volume_ml: None,
        origin: PortionOrigin::ServingSize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::units::{ML_PER_CUP, ML_PER_TBSP};
    use serde_json::json;

    fn cup_portion(amount: f64, grams: f64) -> Value {
        json!({
            "amount": amount,
            "gramWeight": grams,
            "measureUnit": { "id": 1000, "name": "cup", "abbreviation": "cup" }
        })
    }

    #[test]
    fn test_no_portions_uses_nutrient_basis() {
        let portion = reference_portion(&json!({ "fdcId": 1 }));
        assert_eq!(portion, ReferencePortion::nutrient_basis());
        assert_eq!(portion.scale_factor(), 1.0);
    }

    #[test]
    fn test_largest_volume_portion_wins() {
        let entry = json!({
            "foodPortions": [
                {
                    "amount": 1.0,
                    "gramWeight": 15.0,
                    "measureUnit": { "id": 1001, "abbreviation": "tbsp" }
                },
                cup_portion(1.0, 240.0),
                { "amount": 1.0, "gramWeight": 50.0, "measureUnit": { "id": 1119, "name": "slice" } }
            ]
        });
        let portion = reference_portion(&entry);
        assert_eq!(portion.origin, PortionOrigin::FoodPortion);
        assert_eq!(portion.weight_g, 240.0);
        assert_eq!(portion.volume_ml, Some(ML_PER_CUP));
        assert!((portion.scale_factor() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_equal_volume_prefers_heavier_then_first() {
        let entry = json!({ "foodPortions": [cup_portion(1.0, 200.0), cup_portion(1.0, 210.0)] });
        assert_eq!(reference_portion(&entry).weight_g, 210.0);

        let entry = json!({ "foodPortions": [cup_portion(1.0, 200.0), cup_portion(1.0, 200.0)] });
        assert_eq!(reference_portion(&entry).weight_g, 200.0);
    }

    #[test]
    fn test_portion_weight_is_rounded() {
        let entry = json!({ "foodPortions": [cup_portion(1.0, 218.04)] });
        let portion = reference_portion(&entry);
        assert_eq!(portion.weight_g, 218.0);
        assert!((portion.scale_factor() - 2.18).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_portions_are_skipped() {
        let entry = json!({
            "foodPortions": [
                cup_portion(0.0, 240.0),
                cup_portion(1.0, 0.0),
                { "amount": 1.0, "gramWeight": null, "measureUnit": { "id": 1000 } },
                { "amount": "1", "gramWeight": 30.0, "measureUnit": { "id": 1000 } },
                { "amount": 2.0, "gramWeight": 30.0, "measureUnit": { "id": 9999, "name": "undetermined" } }
            ]
        });
        assert_eq!(reference_portion(&entry), ReferencePortion::nutrient_basis());
    }

    #[test]
    fn test_modifier_fallback() {
        let entry = json!({
            "foodPortions": [{
                "amount": 2.0,
                "gramWeight": 28.0,
                "modifier": "tbsp, chopped",
                "measureUnit": { "id": 9999, "name": "undetermined" }
            }]
        });
        let portion = reference_portion(&entry);
        assert!((portion.volume_ml.unwrap() - 2.0 * ML_PER_TBSP).abs() < 1e-9);
        assert_eq!(portion.weight_g, 28.0);
    }

    #[test]
    fn test_serving_size() {
        let grams = reference_portion(&json!({ "servingSize": 30.0, "servingSizeUnit": "g" }));
        assert_eq!(grams.weight_g, 30.0);
        assert_eq!(grams.volume_ml, None);
        assert_eq!(grams.origin, PortionOrigin::ServingSize);

        let unknown = reference_portion(&json!({ "servingSize": 1.0, "servingSizeUnit": "ONZ" }));
        assert_eq!(unknown, ReferencePortion::nutrient_basis());
    }

    #[test]
    fn test_volume_only_serving_size_uses_nutrient_basis() {
        let portion = reference_portion(&json!({ "servingSize": 240.0, "servingSizeUnit": "ml" }));
        assert_eq!(portion, ReferencePortion::nutrient_basis());
    }

    #[test]
    fn test_volume_per_basis() {
        let portion = ReferencePortion {
            weight_g: 200.0,
            volume_ml: Some(250.0),
            origin: PortionOrigin::FoodPortion,
        };
        assert_eq!(portion.volume_per_basis(), Some(125.0));
        assert_eq!(ReferencePortion::nutrient_basis().volume_per_basis(), None);
    }
}
