//! Sparse patch helpers for shared state.
//!
//! Shared state arrives as untyped JSON from a link that may come from an
//! older or newer build. Keys are applied one at a time so that a single
//! malformed or unknown key never discards the rest of the patch.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Replace `target` with the value under `key`, if present and well-formed.
///
/// Returns whether the field was applied.
pub fn patch_field<T>(patch: &Map<String, Value>, key: &str, target: &mut T) -> bool
where
    T: DeserializeOwned,
{
    let Some(value) = patch.get(key) else {
        return false;
    };

    match T::deserialize(value) {
        Ok(parsed) => {
            *target = parsed;
            true
        }
        Err(e) => {
            log::debug!("Skipping shared field '{}': {}", key, e);
            false
        }
    }
}

/// Apply every key of `patch` that names a field of `target`.
///
/// `target` is round-tripped through its JSON object form; keys that are not
/// fields of `target` are ignored and keys whose value does not deserialize
/// are skipped. Returns the number of fields applied.
pub fn apply_sparse<T>(target: &mut T, patch: &Map<String, Value>) -> usize
where
    T: Serialize + DeserializeOwned,
{
    let mut current = match serde_json::to_value(&*target) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return 0,
        Err(e) => {
            log::warn!("Cannot serialize patch target: {}", e);
            return 0;
        }
    };

    let mut applied = 0;
    for (key, value) in patch {
        if !current.contains_key(key) {
            continue;
        }

        let mut candidate = current.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => {
                current = candidate;
                applied += 1;
            }
            Err(e) => log::debug!("Skipping shared field '{}': {}", key, e),
        }
    }

    if applied > 0 {
        if let Ok(next) = serde_json::from_value(Value::Object(current)) {
            *target = next;
        }
    }

    applied
}
