//! Configuración del proceso.
//! Carga variables de entorno (.env) una sola vez y expone una estructura
//! inmutable (`CONFIG`) con los valores por defecto del CLI.
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Formato de documento de merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Filtro de log para env_logger (`MERGEFLOW_LOG`).
    pub log_filter: String,
    /// Formato usado cuando la extensión del archivo no lo determina.
    pub default_format: DocumentFormat,
    /// Hilos del pool de rayon para `plan`; 0 usa el valor por defecto de rayon.
    pub plan_threads: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        let log_filter = env::var("MERGEFLOW_LOG").unwrap_or_else(|_| "warn".to_string());
        let default_format = match env::var("MERGEFLOW_DEFAULT_FORMAT") {
            Ok(raw) => DocumentFormat::parse(&raw)?,
            Err(_) => DocumentFormat::Yaml,
        };
        let plan_threads = match env::var("MERGEFLOW_PLAN_THREADS") {
            Ok(raw) => raw.trim()
                          .parse()
                          .map_err(|_| AppError::Env(format!("MERGEFLOW_PLAN_THREADS={raw}")))?,
            Err(_) => 0,
        };
        Ok(Self { log_filter,
                  default_format,
                  plan_threads })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { log_filter: "warn".to_string(),
               default_format: DocumentFormat::Yaml,
               plan_threads: 0 }
    }
}

/// Instancia global perezosa; si el entorno es inválido se usan los valores por defecto.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| AppConfig::from_env().unwrap_or_default());
