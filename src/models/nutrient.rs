//! Nutrient kinds and extracted measurements

/// One of the eight quantities carried by a canonical record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientKind {
    Calories,
    Fat,
    Carbs,
    Fiber,
    Sugars,
    Protein,
    Weight,
    Volume,
}

impl NutrientKind {
    /// All kinds, in CSV column order
    pub const ALL: [NutrientKind; 8] = [
        NutrientKind::Weight,
        NutrientKind::Volume,
        NutrientKind::Calories,
        NutrientKind::Fat,
        NutrientKind::Carbs,
        NutrientKind::Fiber,
        NutrientKind::Sugars,
        NutrientKind::Protein,
    ];

    /// Unit the extracted amount is expressed in
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            NutrientKind::Calories => "kcal",
            NutrientKind::Volume => "ml",
            _ => "g",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKind::Calories => "calories",
            NutrientKind::Fat => "fat",
            NutrientKind::Carbs => "carbs",
            NutrientKind::Fiber => "fiber",
            NutrientKind::Sugars => "sugars",
            NutrientKind::Protein => "protein",
            NutrientKind::Weight => "weight",
            NutrientKind::Volume => "volume",
        }
    }
}

impl std::fmt::Display for NutrientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted quantity.
///
/// `amount` is `None` when the food does not report the quantity at all,
/// which is different from a reported `Some(0.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientMeasurement {
    pub kind: NutrientKind,
    pub amount: Option<f64>,
    pub unit: String,
}

impl NutrientMeasurement {
    pub fn new(kind: NutrientKind, amount: Option<f64>) -> Self {
        Self {
            kind,
            amount,
            unit: kind.canonical_unit().to_string(),
        }
    }

    /// Measurement for a quantity the food does not report
    pub fn absent(kind: NutrientKind) -> Self {
        Self::new(kind, None)
    }

    pub fn is_present(&self) -> bool {
        self.amount.is_some()
    }
}

/// All eight measurements for one food entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measurements {
    pub weight_g: Option<f64>,
    pub volume_ml: Option<f64>,
    pub calories_kcal: Option<f64>,
    pub fat_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fiber_g: Option<f64>,
    pub sugars_g: Option<f64>,
    pub protein_g: Option<f64>,
}

impl Measurements {
    pub fn get(&self, kind: NutrientKind) -> Option<f64> {
        match kind {
            NutrientKind::Weight => self.weight_g,
            NutrientKind::Volume => self.volume_ml,
            NutrientKind::Calories => self.calories_kcal,
            NutrientKind::Fat => self.fat_g,
            NutrientKind::Carbs => self.carbs_g,
            NutrientKind::Fiber => self.fiber_g,
            NutrientKind::Sugars => self.sugars_g,
            NutrientKind::Protein => self.protein_g,
        }
    }

    pub fn set(&mut self, measurement: NutrientMeasurement) {
        let slot = match measurement.kind {
            NutrientKind::Weight => &mut self.weight_g,
            NutrientKind::Volume => &mut self.volume_ml,
            NutrientKind::Calories => &mut self.calories_kcal,
            NutrientKind::Fat => &mut self.fat_g,
            NutrientKind::Carbs => &mut self.carbs_g,
            NutrientKind::Fiber => &mut self.fiber_g,
            NutrientKind::Sugars => &mut self.sugars_g,
            NutrientKind::Protein => &mut self.protein_g,
        };
        *slot = measurement.amount;
    }
}
