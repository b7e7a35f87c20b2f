//! merge-core: evaluación determinista de parámetros de merge.
//!
//! Crate hoja del workspace. Define la representación de un parámetro
//! ajustable (`ParameterSetting`) y su evaluación para un tensor y una
//! posición `t` del eje de mezcla. No conoce el esquema de configuración
//! ni realiza I/O.
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod setting;

pub use errors::SettingError;
pub use setting::{evaluate_setting, ConditionalParameter, ParameterSetting, ScalarValue};
