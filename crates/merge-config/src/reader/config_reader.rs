use log::{debug, warn};
use merge_core::{evaluate_setting, ScalarValue};

use super::scope::{ParameterScope, CASCADE};
use crate::configuration::MergeConfiguration;
use crate::definition::{InputSliceDefinition, OutputSliceDefinition};
use crate::error::ConfigError;
use crate::model_ref::ModelReference;

/// Contexto de resolución para un tensor en una posición `t`.
///
/// Toma prestada la configuración (inmutable durante todo el merge) y no
/// guarda estado propio: construir uno por tensor es barato, y varios
/// contextos sobre la misma configuración pueden usarse desde hilos distintos.
#[derive(Debug, Clone, Copy)]
pub struct ConfigReader<'a> {
    config: &'a MergeConfiguration,
    tensor_name: &'a str,
    t: f64,
    slice_out: Option<&'a OutputSliceDefinition>,
    slices_in: Option<&'a [InputSliceDefinition]>,
}

impl<'a> ConfigReader<'a> {
    /// Contexto sin slice (merge por modelos).
    pub fn new(config: &'a MergeConfiguration, tensor_name: &'a str, t: f64) -> Self {
        Self { config,
               tensor_name,
               t,
               slice_out: None,
               slices_in: None }
    }

    /// Contexto dentro de un slice de salida: sus fuentes son los `slices_in`.
    pub fn for_output_slice(config: &'a MergeConfiguration,
                            slice: &'a OutputSliceDefinition,
                            tensor_name: &'a str,
                            t: f64)
                            -> Self {
        Self::new(config, tensor_name, t).with_slice_out(slice)
                                         .with_slices_in(&slice.sources)
    }

    pub fn with_slice_out(mut self, slice: &'a OutputSliceDefinition) -> Self {
        self.slice_out = Some(slice);
        self
    }

    pub fn with_slices_in(mut self, slices: &'a [InputSliceDefinition]) -> Self {
        self.slices_in = Some(slices);
        self
    }

    pub fn config(&self) -> &'a MergeConfiguration { self.config }
    pub fn tensor_name(&self) -> &'a str { self.tensor_name }
    pub fn t(&self) -> f64 { self.t }
    pub fn slice_out(&self) -> Option<&'a OutputSliceDefinition> { self.slice_out }
    pub fn slices_in(&self) -> Option<&'a [InputSliceDefinition]> { self.slices_in }

    /// Modelo base efectivo: override del slice de salida o el global.
    pub fn base_model(&self) -> Option<&'a ModelReference> {
        self.slice_out
            .and_then(|s| s.base_model.as_ref())
            .or(self.config.base_model.as_ref())
    }

    /// Resuelve `name` recorriendo la cascada.
    ///
    /// El primer scope que declara el parámetro gana aunque su evaluación sea
    /// `None`; los scopes más generales ya no se consultan. Si nadie lo declara
    /// devuelve `default`, o `MissingRequiredParameter` cuando `required`.
    pub fn parameter(&self,
                     name: &str,
                     model: Option<&ModelReference>,
                     default: Option<ScalarValue>,
                     required: bool)
                     -> Result<Option<ScalarValue>, ConfigError> {
        if let Some((scope, setting)) = self.find_declaration(name, model) {
            let value = evaluate_setting(self.tensor_name, setting, self.t);
            debug!("parameter `{name}` for `{}` (t={}) declared in {} scope -> {:?}",
                   self.tensor_name,
                   self.t,
                   scope.id(),
                   value);
            if value.is_none() {
                warn!("parameter `{name}` is declared in {} scope but evaluates to null for `{}`",
                      scope.id(),
                      self.tensor_name);
            }
            return Ok(value);
        }
        if required {
            return Err(ConfigError::MissingRequiredParameter { name: name.to_string(),
                                                               context: model.map(|m| format!("{m}.{}", self.tensor_name)) });
        }
        debug!("parameter `{name}` not declared for `{}`, using default {:?}", self.tensor_name, default);
        Ok(default)
    }

    /// Parámetro obligatorio y numérico.
    pub fn required_f64(&self, name: &str, model: Option<&ModelReference>) -> Result<f64, ConfigError> {
        match self.parameter(name, model, None, true)? {
            Some(ScalarValue::Number(n)) => Ok(n),
            Some(other) => Err(ConfigError::NonNumericParameter { name: name.to_string(),
                                                                  value: other.to_string() }),
            None => Err(ConfigError::NullParameter { name: name.to_string(),
                                                     tensor: self.tensor_name.to_string() }),
        }
    }

    /// Id del scope que declara `name`, sin evaluarlo.
    pub fn declaring_scope(&self, name: &str, model: Option<&ModelReference>) -> Option<&'static str> {
        self.find_declaration(name, model).map(|(scope, _)| scope.id())
    }

    fn find_declaration(&self,
                        name: &str,
                        model: Option<&ModelReference>)
                        -> Option<(&'static dyn ParameterScope, &'a merge_core::ParameterSetting)> {
        CASCADE.iter()
               .find_map(|scope| scope.lookup(self, name, model).map(|setting| (*scope, setting)))
    }
}
