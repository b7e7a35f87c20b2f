use merge_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(#[from] ConfigError),
    #[error("Formato no soportado: {0}")]
    UnsupportedFormat(String),
    #[error("Variable de entorno inválida: {0}")]
    Env(String),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Slice de salida inexistente: {index} (hay {available})")]
    SliceOutOfRange { index: usize, available: usize },
    #[error("No se pudo crear el pool de hilos: {0}")]
    ThreadPool(String),
}

impl AppError {
    /// Código de salida del CLI asociado a cada familia de error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::SliceOutOfRange { .. } => 2,
            AppError::Io(_) | AppError::UnsupportedFormat(_) | AppError::Env(_) | AppError::ThreadPool(_) => 3,
            AppError::Config(ConfigError::Parse(_)) | AppError::Config(ConfigError::InvalidModelReference(_)) => 3,
            AppError::Config(ConfigError::InvalidConfiguration(_)) => 4,
            AppError::Config(_) | AppError::Serialization(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_variant_from() {
        let io_err = std::io::Error::other("falló IO");
        let err: AppError = io_err.into();
        assert_eq!(err.to_string(), "Error en IO: falló IO");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_config_variant_from() {
        let err: AppError = ConfigError::InvalidConfiguration("sin slices".into()).into();
        assert_eq!(err.to_string(), "Error de configuración: invalid configuration: sin slices");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_missing_parameter_exit_code() {
        let err: AppError = ConfigError::MissingRequiredParameter { name: "weight".into(), context: None }.into();
        assert_eq!(err.exit_code(), 5);
    }
}
