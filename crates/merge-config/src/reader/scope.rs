//! Contrato de los scopes de la cascada de parámetros.
//!
//! Cada scope responde únicamente si *declara* el parámetro; devuelve el
//! setting sin evaluar. La evaluación y el orden los aplica `ConfigReader`.

use merge_core::ParameterSetting;

use super::ConfigReader;
use crate::model_ref::ModelReference;

/// Un nivel de la cascada de resolución.
pub trait ParameterScope: Send + Sync + std::fmt::Debug {
    /// Identificador estable, usado en logs y diagnósticos.
    fn id(&self) -> &'static str;

    /// Setting declarado para `name` en este scope, si existe.
    fn lookup<'a>(&self,
                  reader: &ConfigReader<'a>,
                  name: &str,
                  model: Option<&ModelReference>)
                  -> Option<&'a ParameterSetting>;
}

/// Parámetros de la fuente `model` dentro del slice actual.
#[derive(Debug)]
pub struct SourceSliceScope;

impl ParameterScope for SourceSliceScope {
    fn id(&self) -> &'static str {
        "source_slice"
    }

    fn lookup<'a>(&self,
                  reader: &ConfigReader<'a>,
                  name: &str,
                  model: Option<&ModelReference>)
                  -> Option<&'a ParameterSetting> {
        let model = model?;
        reader.slices_in()?
              .iter()
              .filter(|src| &src.model == model)
              .find_map(|src| src.parameters.as_ref()?.get(name))
    }
}

/// Parámetros del slice de salida actual.
#[derive(Debug)]
pub struct OutputSliceScope;

impl ParameterScope for OutputSliceScope {
    fn id(&self) -> &'static str {
        "output_slice"
    }

    fn lookup<'a>(&self,
                  reader: &ConfigReader<'a>,
                  name: &str,
                  _model: Option<&ModelReference>)
                  -> Option<&'a ParameterSetting> {
        reader.slice_out()?.parameters.as_ref()?.get(name)
    }
}

/// `model_parameters[model]` del documento.
#[derive(Debug)]
pub struct ModelScope;

impl ParameterScope for ModelScope {
    fn id(&self) -> &'static str {
        "model"
    }

    fn lookup<'a>(&self,
                  reader: &ConfigReader<'a>,
                  name: &str,
                  model: Option<&ModelReference>)
                  -> Option<&'a ParameterSetting> {
        reader.config().model_parameters.as_ref()?.get(model?)?.get(name)
    }
}

/// `parameters` globales del documento.
#[derive(Debug)]
pub struct GlobalScope;

impl ParameterScope for GlobalScope {
    fn id(&self) -> &'static str {
        "global"
    }

    fn lookup<'a>(&self,
                  reader: &ConfigReader<'a>,
                  name: &str,
                  _model: Option<&ModelReference>)
                  -> Option<&'a ParameterSetting> {
        reader.config().parameters.as_ref()?.get(name)
    }
}

/// Orden fijo de la cascada: del scope más específico al más general.
pub static CASCADE: [&dyn ParameterScope; 4] = [&SourceSliceScope, &OutputSliceScope, &ModelScope, &GlobalScope];
