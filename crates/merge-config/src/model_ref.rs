//! Identidad de un modelo de entrada.
//!
//! Forma textual: `path` o `path+lora`. El core sólo la usa como clave opaca
//! de igualdad; `Display` es la inversa exacta de `parse`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelReference {
    path: String,
    lora: Option<String>,
}

impl ModelReference {
    pub fn new(path: &str) -> Self {
        Self { path: path.to_string(),
               lora: None }
    }

    pub fn with_lora(path: &str, lora: &str) -> Self {
        Self { path: path.to_string(),
               lora: Some(lora.to_string()) }
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split('+');
        let path = parts.next().unwrap_or_default().trim();
        let lora = parts.next().map(str::trim);
        if path.is_empty() || parts.next().is_some() || lora.is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidModelReference(raw.to_string()));
        }
        Ok(Self { path: path.to_string(),
                  lora: lora.map(str::to_string) })
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn lora(&self) -> Option<&str> { self.lora.as_deref() }
}

impl FromStr for ModelReference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lora {
            Some(lora) => write!(f, "{}+{}", self.path, lora),
            None => write!(f, "{}", self.path),
        }
    }
}

impl Serialize for ModelReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModelReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
