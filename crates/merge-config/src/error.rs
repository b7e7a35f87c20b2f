//! Errores del esquema y de la resolución de parámetros.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter {name}{}", context_suffix(.context))]
    MissingRequiredParameter { name: String, context: Option<String> },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid model reference `{0}`")]
    InvalidModelReference(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("parameter {name} resolved to a non-numeric value: {value}")]
    NonNumericParameter { name: String, value: String },
    #[error("parameter {name} is declared but resolved to null for {tensor}")]
    NullParameter { name: String, tensor: String },
}

fn context_suffix(context: &Option<String>) -> String {
    context.as_ref().map(|c| format!(" for {c}")).unwrap_or_default()
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
