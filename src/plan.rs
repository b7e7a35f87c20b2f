//! Plan de resolución de un parámetro.
//!
//! Para cada slice de salida y cada fuente resuelve el parámetro en cada capa
//! del slice (`t = i / (n - 1)`, o `t = 0` con una sola capa). En modo por
//! modelos se genera una fila por modelo en la posición indicada, con los
//! modelos como fuentes del contexto. Las filas se
//! resuelven en paralelo con rayon sobre la misma configuración inmutable.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use merge_config::{ConfigReader, InputSliceDefinition, MergeConfiguration, ModelReference, OutputSliceDefinition};
use merge_core::ScalarValue;

/// Marcador sustituido por el índice de capa de salida en el nombre de tensor.
pub const LAYER_PLACEHOLDER: &str = "{layer}";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice: Option<usize>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_layer: Option<usize>,
    pub tensor: String,
    pub t: f64,
    /// Scope que declaró el parámetro; `None` si nadie lo declara.
    pub scope: Option<&'static str>,
    pub value: Option<ScalarValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterPlan {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: String,
    pub merge_method: String,
    pub parameter: String,
    pub rows: Vec<PlanRow>,
}

/// Opciones del plan.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub parameter: String,
    /// Nombre de tensor; `{layer}` se reemplaza por la capa de salida.
    pub tensor_template: String,
    /// Posición usada en modo por modelos.
    pub t: f64,
    /// Hilos de rayon; 0 usa el pool global.
    pub threads: usize,
}

/// Posición normalizada de la capa `index` dentro de un slice de `count` capas.
pub fn layer_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Slice de salida `index`, o `None` si no se pidió ninguno.
pub fn select_slice(config: &MergeConfiguration,
                    index: Option<usize>)
                    -> Result<Option<&OutputSliceDefinition>, AppError> {
    let slices = config.output_slices();
    index.map(|index| {
             slices.get(index).ok_or(AppError::SliceOutOfRange { index,
                                                                  available: slices.len() })
         })
         .transpose()
}

/// Reader para un contexto de resolución.
///
/// Con slice de salida sus fuentes forman el contexto; sin él, en modo por
/// modelos, lo forman `model_sources` (ver `MergeConfiguration::model_sources`).
/// `resolve` y `plan` construyen el reader por aquí para que ambos coincidan.
pub fn context_reader<'a>(config: &'a MergeConfiguration,
                          slice: Option<&'a OutputSliceDefinition>,
                          model_sources: &'a [InputSliceDefinition],
                          tensor: &'a str,
                          t: f64)
                          -> ConfigReader<'a> {
    match slice {
        Some(slice) => ConfigReader::for_output_slice(config, slice, tensor, t),
        None if !model_sources.is_empty() => ConfigReader::new(config, tensor, t).with_slices_in(model_sources),
        None => ConfigReader::new(config, tensor, t),
    }
}

struct WorkItem<'a> {
    slice_idx: Option<usize>,
    slice: Option<&'a OutputSliceDefinition>,
    model: &'a ModelReference,
    source_layer: Option<usize>,
    output_layer: Option<usize>,
    t: f64,
}

pub fn build_plan(config: &MergeConfiguration, options: &PlanOptions) -> Result<ParameterPlan, AppError> {
    config.validate()?;
    let model_sources = config.model_sources();
    let items = work_items(config, &model_sources, options.t);
    let rows = if options.threads == 0 {
        resolve_rows(config, &model_sources, options, &items)
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(options.threads)
                                                  .build()
                                                  .map_err(|e| AppError::ThreadPool(e.to_string()))?;
        pool.install(|| resolve_rows(config, &model_sources, options, &items))
    };
    Ok(ParameterPlan { run_id: Uuid::new_v4(),
                       generated_at: Utc::now(),
                       fingerprint: config.fingerprint()?,
                       merge_method: config.merge_method.clone(),
                       parameter: options.parameter.clone(),
                       rows })
}

fn work_items<'a>(config: &'a MergeConfiguration,
                  model_sources: &'a [InputSliceDefinition],
                  models_t: f64)
                  -> Vec<WorkItem<'a>> {
    let mut items = Vec::new();
    let mut offset = 0;
    for (slice_idx, slice) in config.output_slices().iter().enumerate() {
        let count = slice.layer_count();
        for src in &slice.sources {
            items.extend((0..count).map(|i| source_item(slice_idx, slice, src, i, offset + i, layer_position(i, count))));
        }
        offset += count;
    }
    items.extend(model_sources.iter().map(|src| WorkItem { slice_idx: None,
                                                             slice: None,
                                                             model: &src.model,
                                                             source_layer: None,
                                                             output_layer: None,
                                                             t: models_t }));
    items
}

fn source_item<'a>(slice_idx: usize,
                   slice: &'a OutputSliceDefinition,
                   src: &'a InputSliceDefinition,
                   index: usize,
                   output_layer: usize,
                   t: f64)
                   -> WorkItem<'a> {
    WorkItem { slice_idx: Some(slice_idx),
               slice: Some(slice),
               model: &src.model,
               source_layer: Some(src.layer_range.0 + index),
               output_layer: Some(output_layer),
               t }
}

fn resolve_rows(config: &MergeConfiguration,
                model_sources: &[InputSliceDefinition],
                options: &PlanOptions,
                items: &[WorkItem<'_>])
                -> Vec<PlanRow> {
    items.par_iter()
         .map(|item| {
             let tensor = match item.output_layer {
                 Some(layer) => options.tensor_template.replace(LAYER_PLACEHOLDER, &layer.to_string()),
                 None => options.tensor_template.clone(),
             };
             let reader = context_reader(config, item.slice, model_sources, &tensor, item.t);
             let scope = reader.declaring_scope(&options.parameter, Some(item.model));
             // No es requerido: un parámetro ausente queda como fila con scope None.
             let value = reader.parameter(&options.parameter, Some(item.model), None, false)
                               .unwrap_or(None);
             PlanRow { slice: item.slice_idx,
                       model: item.model.to_string(),
                       source_layer: item.source_layer,
                       output_layer: item.output_layer,
                       tensor,
                       t: item.t,
                       scope,
                       value }
         })
         .collect()
}
