//! FDC schema variants
//!
//! Detects which data set shape a parsed document uses and provides the
//! per-variant accessors that locate nutrient items inside a food entry.

use serde_json::Value;

/// Upstream data set a food entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    Foundation,
    SrLegacy,
}

impl SchemaVariant {
    /// Top-level key wrapping the entry list in a full download
    pub fn wrapper_key(&self) -> &'static str {
        match self {
            SchemaVariant::Foundation => "FoundationFoods",
            SchemaVariant::SrLegacy => "SRLegacyFoods",
        }
    }

    /// Value of a food entry's `dataType` field
    pub fn data_type(&self) -> &'static str {
        match self {
            SchemaVariant::Foundation => "Foundation",
            SchemaVariant::SrLegacy => "SR Legacy",
        }
    }

    pub fn from_data_type(s: &str) -> Option<Self> {
        match s.trim() {
            "Foundation" => Some(SchemaVariant::Foundation),
            "SR Legacy" => Some(SchemaVariant::SrLegacy),
            _ => None,
        }
    }

    /// Accessor strategy for entries of this variant
    pub fn accessor(&self) -> &'static dyn NutrientAccessor {
        match self {
            SchemaVariant::Foundation => &FoundationAccessor,
            SchemaVariant::SrLegacy => &SrLegacyAccessor,
        }
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.data_type())
    }
}

/// One item of a food's `foodNutrients` list, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct RawNutrient<'a> {
    /// FDC nutrient number in normalized text form ("208", "205.2")
    pub number: String,
    /// `None` when the amount is missing, null or not a number
    pub amount: Option<f64>,
    pub unit: Option<&'a str>,
}

/// Locates nutrient items inside one food entry
pub trait NutrientAccessor: Sync {
    fn variant(&self) -> SchemaVariant;

    /// Nutrient items of `entry`, in document order.
    ///
    /// Items without a readable nutrient number are dropped.
    fn nutrients<'a>(&self, entry: &'a Value) -> Vec<RawNutrient<'a>>;
}

/// Foundation foods: `{ "nutrient": { "number", "unitName" }, "amount" }`
pub struct FoundationAccessor;

/// SR Legacy foods: the nested Foundation shape, or the flat abridged
/// shape `{ "nutrientNumber", "unitName", "value" }`
pub struct SrLegacyAccessor;

impl NutrientAccessor for FoundationAccessor {
    fn variant(&self) -> SchemaVariant {
        SchemaVariant::Foundation
    }

    fn nutrients<'a>(&self, entry: &'a Value) -> Vec<RawNutrient<'a>> {
        food_nutrients(entry)
            .iter()
            .filter_map(read_nested)
            .collect()
    }
}

impl NutrientAccessor for SrLegacyAccessor {
    fn variant(&self) -> SchemaVariant {
        SchemaVariant::SrLegacy
    }

    fn nutrients<'a>(&self, entry: &'a Value) -> Vec<RawNutrient<'a>> {
        food_nutrients(entry)
            .iter()
            .filter_map(|item| read_nested(item).or_else(|| read_flat(item)))
            .collect()
    }
}

fn food_nutrients(entry: &Value) -> &[Value] {
    entry
        .get("foodNutrients")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn read_nested(item: &Value) -> Option<RawNutrient<'_>> {
    let nutrient = item.get("nutrient")?;
    let number = nutrient_number(nutrient.get("number")?)?;
    Some(RawNutrient {
        number,
        amount: item.get("amount").and_then(Value::as_f64),
        unit: nutrient.get("unitName").and_then(Value::as_str),
    })
}

fn read_flat(item: &Value) -> Option<RawNutrient<'_>> {
    let number = nutrient_number(item.get("nutrientNumber")?)?;
    Some(RawNutrient {
        number,
        amount: item
            .get("value")
            .or_else(|| item.get("amount"))
            .and_then(Value::as_f64),
        unit: item.get("unitName").and_then(Value::as_str),
    })
}

/// Normalize a nutrient number given as a JSON string or number
pub fn nutrient_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

// ============================================================================
// Document layout detection
// ============================================================================

/// A list of food entries sharing one schema variant
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub variant: SchemaVariant,
    pub entries: &'a [Value],
}

/// Find the food entry lists in a parsed FDC document.
///
/// Wrapper keys are checked first; a document carrying both yields the
/// Foundation section before the SR Legacy one. A bare top-level list is
/// taken as the entry list itself, typed by its first entry's `dataType`
/// and defaulting to SR Legacy when that field is missing. Returns a reason
/// when neither shape fits or the `dataType` names another data set.
pub fn detect_layout(doc: &Value) -> Result<Vec<Section<'_>>, String> {
    match doc {
        Value::Object(map) => {
            let mut sections = Vec::new();
            for variant in [SchemaVariant::Foundation, SchemaVariant::SrLegacy] {
                let key = variant.wrapper_key();
                if let Some(value) = map.get(key) {
                    let entries = value
                        .as_array()
                        .ok_or_else(|| format!("'{}' is not a list", key))?;
                    sections.push(Section {
                        variant,
                        entries: entries.as_slice(),
                    });
                }
            }

            if sections.is_empty() {
                let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                keys.sort_unstable();
                return Err(format!(
                    "expected a 'FoundationFoods' or 'SRLegacyFoods' key, found [{}]",
                    keys.join(", ")
                ));
            }
            Ok(sections)
        }
        Value::Array(entries) => {
            let data_type = entries
                .first()
                .and_then(|e| e.get("dataType"))
                .and_then(Value::as_str);
            let variant = match data_type {
                None => SchemaVariant::SrLegacy,
                Some(dt) => SchemaVariant::from_data_type(dt).ok_or_else(|| {
                    format!(
                        "list entries have dataType '{}', expected 'Foundation' or 'SR Legacy'",
                        dt
                    )
                })?,
            };
            Ok(vec![Section {
                variant,
                entries: entries.as_slice(),
            }])
        }
        other => Err(format!(
            "top-level document is {}, expected an object or a list",
            json_type_name(other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
