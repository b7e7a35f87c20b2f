//! Documento raíz de configuración de merge.
//!
//! La validación es responsabilidad de este módulo: el reader asume un
//! documento ya validado y nunca lo modifica.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::definition::{InputModelDefinition, InputSliceDefinition, OutputSliceDefinition, ParameterMap};
use crate::error::ConfigError;
use crate::model_ref::ModelReference;
use merge_core::hashing::fingerprint_value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfiguration {
    pub merge_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slices: Option<Vec<OutputSliceDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<InputModelDefinition>>,
    /// Parámetros por modelo, aplicados en todos los slices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_parameters: Option<IndexMap<ModelReference, ParameterMap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<ModelReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
}

impl MergeConfiguration {
    /// Configuración vacía para `merge_method`; se completa con los builders.
    pub fn new(merge_method: &str) -> Self {
        Self { merge_method: merge_method.to_string(),
               slices: None,
               models: None,
               model_parameters: None,
               parameters: None,
               base_model: None,
               dtype: None }
    }

    pub fn with_slices(mut self, slices: Vec<OutputSliceDefinition>) -> Self {
        self.slices = Some(slices);
        self
    }

    pub fn with_models(mut self, models: Vec<InputModelDefinition>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_parameter(mut self, name: &str, setting: impl Into<merge_core::ParameterSetting>) -> Self {
        self.parameters.get_or_insert_with(ParameterMap::new).insert(name.to_string(), setting.into());
        self
    }

    pub fn with_model_parameter(mut self,
                                model: ModelReference,
                                name: &str,
                                setting: impl Into<merge_core::ParameterSetting>)
                                -> Self {
        self.model_parameters
            .get_or_insert_with(IndexMap::new)
            .entry(model)
            .or_default()
            .insert(name.to_string(), setting.into());
        self
    }

    pub fn with_base_model(mut self, model: ModelReference) -> Self {
        self.base_model = Some(model);
        self
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Slices de salida declarados (vacío en modo por modelos).
    pub fn output_slices(&self) -> &[OutputSliceDefinition] {
        self.slices.as_deref().unwrap_or_default()
    }

    /// Modelos de entrada declarados (vacío en modo por slices).
    pub fn input_models(&self) -> &[InputModelDefinition] {
        self.models.as_deref().unwrap_or_default()
    }

    /// Valida el documento.
    ///
    /// Exactamente uno de `slices`/`models` debe ser no vacío. Además el método
    /// no puede estar vacío, cada slice necesita al menos una fuente, los
    /// rangos de capas no pueden estar invertidos y todas las fuentes de un
    /// slice deben cubrir el mismo número de capas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_slices = !self.output_slices().is_empty();
        let has_models = !self.input_models().is_empty();
        if has_slices == has_models {
            return Err(ConfigError::InvalidConfiguration("Must specify either output slices or models to merge".into()));
        }
        if self.merge_method.trim().is_empty() {
            return Err(ConfigError::InvalidConfiguration("merge_method must not be empty".into()));
        }
        for (idx, slice) in self.output_slices().iter().enumerate() {
            if slice.sources.is_empty() {
                return Err(ConfigError::InvalidConfiguration(format!("output slice {idx} has no sources")));
            }
            for src in &slice.sources {
                let (start, end) = src.layer_range;
                if start > end {
                    return Err(ConfigError::InvalidConfiguration(format!("output slice {idx}: layer_range [{start}, {end}] of {} is inverted",
                                                                         src.model)));
                }
            }
            let expected = slice.layer_count();
            if let Some(src) = slice.sources.iter().find(|src| src.layer_count() != expected) {
                return Err(ConfigError::InvalidConfiguration(format!("output slice {idx}: {} spans {} layers, expected {expected}",
                                                                     src.model,
                                                                     src.layer_count())));
            }
        }
        Ok(())
    }

    /// Conjunto deduplicado (y ordenado) de modelos referenciados en cualquier
    /// parte del documento.
    pub fn referenced_models(&self) -> Vec<ModelReference> {
        let mut models = BTreeSet::new();
        if let Some(per_model) = &self.model_parameters {
            models.extend(per_model.keys().cloned());
        }
        for slice in self.output_slices() {
            models.extend(slice.sources.iter().map(|src| src.model.clone()));
            models.extend(slice.base_model.iter().cloned());
        }
        models.extend(self.input_models().iter().map(|m| m.model.clone()));
        models.extend(self.base_model.iter().cloned());
        models.into_iter().collect()
    }

    /// Modelos de entrada vistos como fuentes del contexto de resolución (modo
    /// por modelos). Sin rango de capas: sólo aportan sus parámetros.
    pub fn model_sources(&self) -> Vec<InputSliceDefinition> {
        self.input_models().iter().map(|m| m.to_input_slice((0, 0))).collect()
    }

    /// Fingerprint estable del documento (independiente del orden de claves).
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let value = serde_json::to_value(self)?;
        Ok(fingerprint_value(&value))
    }
}
