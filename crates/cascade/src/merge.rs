//! deep merge of documents
//!
//! - mappings: merged key by key (recursive)
//! - sequences: replaced, never concatenated or merged by index
//! - scalars and null: replaced
//!
//! Keys only present in the base keep their position. New keys are appended in the order of the overlay.
use crate::document::INHERITS_KEY;
use crate::value::{Mapping, Value};

/// Merge `overlay` over `base`, returning a new mapping
pub fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();

    for (key, overlay_value) in overlay {
        let value = match merged.get(key) {
            Some(base_value) => merge_value(base_value, overlay_value),
            None => overlay_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

fn merge_value(base: &Value, overlay: &Value) -> Value {
    use Value::*;

    match (base, overlay) {
        (Object(base), Object(overlay)) => Object(merge(base, overlay)),

        // a mapping replaces anything that is not a mapping
        (Null | Boolean(_) | Integer(_) | Decimal(_) | String(_) | Array(_), Object(_)) => {
            overlay.clone()
        }

        // sequences always replace, last writer wins the entire list
        (_, Array(_)) => overlay.clone(),

        (_, Null | Boolean(_) | Integer(_) | Decimal(_) | String(_)) => overlay.clone(),
    }
}

/// Fold documents in chain order, most basal first
///
/// The inheritance declaration is removed from the result.
pub fn merge_chain<'a>(documents: impl IntoIterator<Item = &'a Mapping>) -> Mapping {
    let mut merged = documents
        .into_iter()
        .fold(Mapping::new(), |merged, document| merge(&merged, document));

    merged.shift_remove(INHERITS_KEY);
    merged
}
