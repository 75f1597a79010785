//! Unit tables and conversion constants
//!
//! Maps FDC measure units and free-text unit strings to grams or milliliters.

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.928906;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.78672;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.5875;
/// Milliliters per pint (US)
pub const ML_PER_PINT: f64 = 473.176;
/// Milliliters per quart (US)
pub const ML_PER_QUART: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per gallon (US)
pub const ML_PER_GALLON: f64 = 3785.41;

// ============================================================================
// Weight / Energy Constants
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

/// Kilocalories per kilojoule, as applied to FDC nutrient 268
pub const KCAL_PER_KJ: f64 = 0.239;

/// FDC nutrient amounts are reported per this many grams of food
pub const NUTRIENT_BASIS_G: f64 = 100.0;

// ============================================================================
// Unit Recognition
// ============================================================================

/// Milliliters per FDC `measureUnit.id`, for the volume units FDC uses
pub fn ml_per_measure_unit_id(id: i64) -> Option<f64> {
    match id {
        1000 => Some(ML_PER_CUP),
        1001 => Some(ML_PER_TBSP),
        1002 => Some(ML_PER_TSP),
        1004 => Some(1.0),
        _ => None,
    }
}

/// Get the conversion factor to grams for a weight unit
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "g" | "gm" | "grm" | "gram" | "grams" => Some(1.0),
        "mg" | "milligram" | "milligrams" => Some(G_PER_MG),
        "kg" | "kilogram" | "kilograms" => Some(G_PER_KG),
        "oz" | "ounce" | "ounces" => Some(G_PER_OZ),
        "lb" | "lbs" | "pound" | "pounds" => Some(G_PER_LB),
        _ => None,
    }
}

/// Get the conversion factor to milliliters for a volume unit
pub fn ml_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        "ml" | "mlt" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Some(1.0),
        "l" | "liter" | "liters" | "litre" | "litres" => Some(ML_PER_LITER),
        "tsp" | "teaspoon" | "teaspoons" => Some(ML_PER_TSP),
        "tbsp" | "tablespoon" | "tablespoons" => Some(ML_PER_TBSP),
        "fl oz" | "floz" | "fluid ounce" | "fluid ounces" => Some(ML_PER_FL_OZ),
        "cup" | "cups" => Some(ML_PER_CUP),
        "pint" | "pints" => Some(ML_PER_PINT),
        "quart" | "quarts" => Some(ML_PER_QUART),
        "gallon" | "gallons" => Some(ML_PER_GALLON),
        _ => None,
    }
}

/// Whether an FDC energy unit string denotes kilojoules
pub fn is_kilojoule(unit: &str) -> bool {
    unit.trim().eq_ignore_ascii_case("kj")
}

/// Round to one decimal place, never producing negative zero
pub fn round_to_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
