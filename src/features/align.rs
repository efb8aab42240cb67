//! Schema alignment: feature record → model input vector.

use std::collections::BTreeMap;

/// Conform a named feature map to the model's declared column order.
///
/// Schema columns missing from the map are zero-filled; map entries the
/// schema does not declare are dropped. The output length and order always
/// match `schema` exactly — the model is order-sensitive. Never fails.
pub fn align(features: &BTreeMap<String, f64>, schema: &[String]) -> Vec<f64> {
    let mut missing: Vec<&str> = Vec::new();

    let vector: Vec<f64> = schema
        .iter()
        .map(|column| match features.get(column) {
            | Some(value) if value.is_finite() => *value,
            | Some(_) => 0.0,
            | None => {
                missing.push(column);
                0.0
            }
        })
        .collect();

    if !missing.is_empty() {
        log::warn!(
            "model schema declares {} column(s) the extractor did not produce (zero-filled): {}",
            missing.len(),
            missing.join(", ")
        );
    }

    vector
}
