//! Resolución de parámetros por tensor.
//!
//! `ConfigReader` es el contexto efímero (configuración, tensor, `t`, slice de
//! salida y fuentes) construido en cada paso de producción de un tensor.
//! `scope` define la cascada fija de scopes consultados en orden.

mod config_reader;
mod scope;

pub use config_reader::ConfigReader;
pub use scope::{GlobalScope, ModelScope, OutputSliceScope, ParameterScope, SourceSliceScope, CASCADE};
