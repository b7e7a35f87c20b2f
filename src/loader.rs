//! Lectura de documentos de merge desde disco.
//!
//! El formato se decide por extensión (`.yaml`, `.yml`, `.json`); si no la hay
//! o no se reconoce se usa el formato por defecto de la configuración.

use log::info;
use std::fs;
use std::path::Path;

use crate::config::{DocumentFormat, CONFIG};
use crate::errors::AppError;
use merge_config::MergeConfiguration;

/// Formato de `path` según su extensión, o `fallback`.
pub fn detect_format(path: &Path, fallback: DocumentFormat) -> DocumentFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| DocumentFormat::parse(ext).ok())
        .unwrap_or(fallback)
}

/// Parsea un documento ya leído. No valida: ver `MergeConfiguration::validate`.
pub fn parse_document(raw: &str, format: DocumentFormat) -> Result<MergeConfiguration, AppError> {
    let config = match format {
        DocumentFormat::Yaml => MergeConfiguration::from_yaml_str(raw)?,
        DocumentFormat::Json => MergeConfiguration::from_json_str(raw)?,
    };
    Ok(config)
}

pub fn load_configuration_as(path: &Path, fallback: DocumentFormat) -> Result<MergeConfiguration, AppError> {
    let format = detect_format(path, fallback);
    let raw = fs::read_to_string(path)?;
    let config = parse_document(&raw, format)?;
    info!("loaded merge configuration {} ({:?}, method={})", path.display(), format, config.merge_method);
    Ok(config)
}

/// Carga con el formato por defecto de `CONFIG`.
pub fn load_configuration(path: &Path) -> Result<MergeConfiguration, AppError> {
    load_configuration_as(path, CONFIG.default_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(&PathBuf::from("merge.yml"), DocumentFormat::Json), DocumentFormat::Yaml);
        assert_eq!(detect_format(&PathBuf::from("merge.JSON"), DocumentFormat::Yaml), DocumentFormat::Json);
        assert_eq!(detect_format(&PathBuf::from("merge"), DocumentFormat::Json), DocumentFormat::Json);
        assert_eq!(detect_format(&PathBuf::from("merge.txt"), DocumentFormat::Yaml), DocumentFormat::Yaml);
    }

    #[test]
    fn parse_document_reports_parse_errors() {
        let err = parse_document("merge_method: [", DocumentFormat::Yaml).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
