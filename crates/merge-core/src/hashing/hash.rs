//! Hash helpers sobre blake3.

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;
use crate::constants::FINGERPRINT_VERSION;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Fingerprint estable de un documento JSON: versión de formato + JSON canónico.
pub fn fingerprint_value(value: &Value) -> String {
    let mut h = Hasher::new();
    h.update(FINGERPRINT_VERSION.as_bytes());
    h.update(b"\n");
    h.update(to_canonical_json(value).as_bytes());
    h.finalize().to_hex().to_string()
}
