//! Canonical JSON: claves de objetos ordenadas, sin espacios.
//!
//! Dos documentos equivalentes (mismo contenido, distinto orden de claves)
//! producen la misma cadena y por tanto el mismo fingerprint.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Display de Value::String produce el literal JSON escapado.
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let tree: BTreeMap<&String, String> = map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::from(k.as_str()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}
