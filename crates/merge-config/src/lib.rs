//! merge-config: esquema de configuración de merge y resolución en cascada.
//!
//! Módulos:
//! - `model_ref`: identidad de modelo (`path` o `path+lora`).
//! - `definition`: definiciones de modelos y slices de entrada/salida.
//! - `configuration`: documento raíz, validación y fingerprint.
//! - `reader`: contexto de resolución por tensor y cascada de scopes.

pub mod configuration;
pub mod definition;
pub mod error;
pub mod model_ref;
pub mod reader;

pub use configuration::MergeConfiguration;
pub use definition::{InputModelDefinition, InputSliceDefinition, OutputSliceDefinition, ParameterMap};
pub use error::ConfigError;
pub use model_ref::ModelReference;
pub use reader::{ConfigReader, ParameterScope, CASCADE};

pub use merge_core::{evaluate_setting, ConditionalParameter, ParameterSetting, ScalarValue};
