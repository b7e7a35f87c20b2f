//! Errores de construcción de `ParameterSetting`.
//!
//! La evaluación nunca falla; estos errores sólo aparecen al interpretar un
//! documento cuya forma no corresponde a ninguna de las cuatro variantes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SettingError {
    #[error("null is not a valid parameter setting")]
    Null,
    #[error("mixed sequence: element {index} is {found}, expected {expected}")]
    MixedSequence { index: usize, expected: &'static str, found: &'static str },
    #[error("malformed conditional parameter: {0}")]
    MalformedConditional(String),
}
