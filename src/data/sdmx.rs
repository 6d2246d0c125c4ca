//! SDMX-JSON observation extraction.
//!
//! Only the path this tool needs is decoded:
//!
//! ```text
//! { "dataSets": [ { "series": { "<key>": { "observations": { "<idx>": [value, ...] } } } } ] }
//! ```
//!
//! The first series of the first dataset is used. Observations are read in
//! document order (`serde_json` is built with `preserve_order`), and the first
//! element of each observation array is its value.

use serde_json::{Map, Value};

use crate::domain::FetchFailure;
use crate::math::fill_gaps;

/// Decode a response body into a gap-free, non-empty value list.
pub fn extract_observations(body: &str) -> Result<Vec<f64>, FetchFailure> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchFailure::Decode(e.to_string()))?;
    extract_from_value(&root)
}

/// Same as [`extract_observations`] for an already-parsed document.
pub fn extract_from_value(root: &Value) -> Result<Vec<f64>, FetchFailure> {
    let dataset = root
        .get("dataSets")
        .and_then(Value::as_array)
        .and_then(|sets| sets.first())
        .ok_or_else(|| FetchFailure::MissingField("dataSets".to_string()))?;

    let series = object_field(dataset, "series")?;
    let Some(first) = series.values().next() else {
        return Err(FetchFailure::Empty);
    };
    let observations = object_field(first, "observations")?;

    let mut values = Vec::with_capacity(observations.len());
    for (index, obs) in observations {
        values.push(observation_value(index, obs)?);
    }

    if values.iter().all(|v| v.is_nan()) {
        return Err(FetchFailure::Empty);
    }
    Ok(fill_gaps(&values))
}

fn object_field<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, FetchFailure> {
    value
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| FetchFailure::MissingField(field.to_string()))
}

/// First element of an observation array. `null` is a gap (NaN).
fn observation_value(index: &str, obs: &Value) -> Result<f64, FetchFailure> {
    let first = obs
        .as_array()
        .and_then(|items| items.first())
        .ok_or_else(|| FetchFailure::Decode(format!("observation {index} is not a non-empty array")))?;

    match first {
        Value::Null => Ok(f64::NAN),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FetchFailure::Decode(format!("observation {index} is not representable as f64"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| FetchFailure::Decode(format!("observation {index} has non-numeric value '{s}'"))),
        other => Err(FetchFailure::Decode(format!(
            "observation {index} has unexpected value {other}"
        ))),
    }
}
