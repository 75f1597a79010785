//! Record normalization
//!
//! Turns one raw FDC food entry into a `CanonicalRecord`.

use serde_json::Value;

use crate::error::EntryError;
use crate::models::CanonicalRecord;
use crate::nutrition::NutrientLookup;
use super::alt_names::AltNameMap;

/// Normalize a food entry.
///
/// `fdcId` and `description` are copied verbatim; the eight measurements come
/// from `lookup` unchanged. Fails only when the entry is unusable as a row.
pub fn normalize(
    entry: &Value,
    lookup: &NutrientLookup,
    alt_names: &AltNameMap,
) -> Result<CanonicalRecord, EntryError> {
    if !entry.is_object() {
        return Err(EntryError::NotAnObject);
    }

    let fdc_id = entry
        .get("fdcId")
        .and_then(fdc_id_value)
        .ok_or(EntryError::MissingFdcId)?;

    let description = entry
        .get("description")
        .and_then(Value::as_str)
        .ok_or(EntryError::MissingDescription { fdc_id })?;

    let alt_name = alt_names.lookup(fdc_id).map(str::to_string);
    let measurements = lookup.extract_all(entry);

    Ok(CanonicalRecord::new(
        fdc_id,
        description.to_string(),
        alt_name,
        measurements,
        lookup.variant(),
    ))
}

/// FDC ids are integers; some exports quote them
fn fdc_id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
