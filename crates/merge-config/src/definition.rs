//! Definiciones de modelos de entrada y slices.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model_ref::ModelReference;
use merge_core::ParameterSetting;

/// Parámetros declarados en un scope, en orden de declaración.
pub type ParameterMap = IndexMap<String, ParameterSetting>;

/// Modelo completo de entrada (merge por modelos, sin slices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputModelDefinition {
    pub model: ModelReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterMap>,
}

impl InputModelDefinition {
    /// Vista como fuente de slice sobre `layer_range`, con sus mismos parámetros.
    ///
    /// Así un merge por modelos resuelve `parameters` propios en el scope de
    /// fuente, igual que un merge por slices.
    pub fn to_input_slice(&self, layer_range: (usize, usize)) -> InputSliceDefinition {
        InputSliceDefinition { model: self.model.clone(),
                               layer_range,
                               parameters: self.parameters.clone() }
    }
}

/// Rango de capas de un modelo fuente que contribuye a un slice de salida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSliceDefinition {
    pub model: ModelReference,
    /// Rango inclusivo `[inicio, fin]` de índices de capa.
    pub layer_range: (usize, usize),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterMap>,
}

impl InputSliceDefinition {
    pub fn new(model: ModelReference, layer_range: (usize, usize)) -> Self {
        Self { model,
               layer_range,
               parameters: None }
    }

    /// Agrega (o reemplaza) un parámetro propio de esta fuente.
    pub fn with_parameter(mut self, name: &str, setting: impl Into<ParameterSetting>) -> Self {
        self.parameters.get_or_insert_with(ParameterMap::new).insert(name.to_string(), setting.into());
        self
    }

    /// Número de capas cubiertas; 0 si el rango está invertido.
    pub fn layer_count(&self) -> usize {
        let (start, end) = self.layer_range;
        if end < start {
            0
        } else {
            end - start + 1
        }
    }
}

/// Slice de salida: fuentes que lo componen y overrides propios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSliceDefinition {
    pub sources: Vec<InputSliceDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<ModelReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParameterMap>,
}

impl OutputSliceDefinition {
    pub fn new(sources: Vec<InputSliceDefinition>) -> Self {
        Self { sources,
               base_model: None,
               residual_weight: None,
               parameters: None }
    }

    pub fn with_parameter(mut self, name: &str, setting: impl Into<ParameterSetting>) -> Self {
        self.parameters.get_or_insert_with(ParameterMap::new).insert(name.to_string(), setting.into());
        self
    }

    /// Número de capas del slice: el de la primera fuente.
    pub fn layer_count(&self) -> usize {
        self.sources.first().map(InputSliceDefinition::layer_count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_range_is_inclusive() {
        let s = InputSliceDefinition::new(ModelReference::new("a"), (4, 7));
        assert_eq!(s.layer_count(), 4);
        let single = InputSliceDefinition::new(ModelReference::new("a"), (3, 3));
        assert_eq!(single.layer_count(), 1);
        let inverted = InputSliceDefinition::new(ModelReference::new("a"), (5, 2));
        assert_eq!(inverted.layer_count(), 0);
    }

    #[test]
    fn model_definition_as_input_slice_keeps_parameters() {
        let def = InputModelDefinition { model: ModelReference::new("a"),
                                         parameters: Some(ParameterMap::from([("weight".to_string(),
                                                                                ParameterSetting::from(0.3))])) };
        let src = def.to_input_slice((0, 11));
        assert_eq!(src.layer_count(), 12);
        assert_eq!(src.parameters, def.parameters);
    }

    #[test]
    fn slice_parses_from_yaml() {
        let yaml = r#"
sources:
  - model: org/model-a
    layer_range: [0, 15]
    parameters:
      weight: [0.0, 0.5, 1.0]
  - model: org/model-b+org/lora
    layer_range: [0, 15]
residual_weight: 0.1
parameters:
  density: 0.6
"#;
        let slice: OutputSliceDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(slice.sources.len(), 2);
        assert_eq!(slice.sources[1].model, ModelReference::with_lora("org/model-b", "org/lora"));
        assert_eq!(slice.layer_count(), 16);
        assert_eq!(slice.residual_weight, Some(0.1));
        let weight = &slice.sources[0].parameters.as_ref().unwrap()["weight"];
        assert_eq!(weight, &ParameterSetting::Gradient(vec![0.0, 0.5, 1.0]));
    }
}
