//! Representación y evaluación de parámetros ajustables.
//!
//! Un parámetro se declara en el documento de configuración con una de cuatro
//! formas (escalar, gradiente, secuencia escalonada o lista condicional). La
//! forma se discrimina una sola vez al construir el `ParameterSetting`; la
//! evaluación posterior es un `match` exhaustivo sin inspección de tipos.

mod evaluate;
mod parameter;
mod value;

pub use evaluate::evaluate_setting;
pub use parameter::{ConditionalParameter, ParameterSetting};
pub use value::ScalarValue;
