//! Constantes del core de evaluación.
//!
//! `FINGERPRINT_VERSION` participa en el hashing de configuraciones: un cambio
//! de versión invalida los fingerprints aunque el documento no cambie.

/// Versión lógica del formato de fingerprint. Mantener estable mientras la
/// serialización canónica del esquema no cambie.
pub const FINGERPRINT_VERSION: &str = "M1.0";

/// Filtro comodín de un `ConditionalParameter`: aplica a cualquier tensor.
pub const WILDCARD_FILTER: &str = "*";
