//! mergeflow
//!
//! Capa de aplicación sobre `merge-core` y `merge-config`:
//! - `config`: configuración del proceso desde variables de entorno (.env).
//! - `errors`: errores de aplicación (I/O, formato, configuración).
//! - `loader`: lectura de documentos de merge YAML/JSON desde disco.
//! - `plan`: resolución de un parámetro por capa para cada slice y fuente.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod errors;
pub mod loader;
pub mod plan;

pub use errors::AppError;
