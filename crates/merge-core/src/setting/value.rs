use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Valor escalar de un parámetro: número, booleano o texto.
///
/// Los booleanos no se consideran numéricos: una secuencia que los contenga
/// se interpreta como secuencia escalonada, nunca como gradiente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl ScalarValue {
    /// Convierte un escalar JSON. Arrays, objetos y `null` no son escalares.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Parsea un literal de línea de comandos: número, `true`/`false` o texto.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            return Self::Number(n);
        }
        match trimmed {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Text(raw.to_string()),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(n: f64) -> Self { Self::Number(n) }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self { Self::Text(s) }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Nombre corto del tipo JSON, usado en mensajes de error.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
