use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::evaluate::evaluate_setting;
use super::value::{kind_name, ScalarValue};
use crate::constants::WILDCARD_FILTER;
use crate::errors::SettingError;

/// Parámetro ajustable tal como se declara en la configuración.
///
/// - `Scalar`: valor fijo, independiente de `t`.
/// - `Gradient`: puntos de control numéricos repartidos uniformemente en
///   `t ∈ [0, 1]` e interpolados linealmente.
/// - `Steps`: secuencia de escalares (no todos numéricos) muestreada por el
///   índice anterior más cercano, sin interpolar.
/// - `Conditional`: lista de filtros por nombre de tensor; gana el primero
///   que coincide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterSetting {
    Scalar(ScalarValue),
    Gradient(Vec<f64>),
    Steps(Vec<ScalarValue>),
    Conditional(Vec<ConditionalParameter>),
}

impl ParameterSetting {
    /// Discrimina la forma de un valor JSON ya parseado.
    ///
    /// Una secuencia vacía se interpreta como gradiente vacío (evalúa a
    /// `None`). Un único mapping `{value, filter}` se normaliza a una lista
    /// condicional de un elemento. Las secuencias mixtas se rechazan.
    pub fn from_json(value: &Value) -> Result<Self, SettingError> {
        match value {
            Value::Null => Err(SettingError::Null),
            Value::Array(items) => Self::from_sequence(items),
            Value::Object(map) => Ok(Self::Conditional(vec![ConditionalParameter::from_map(map)?])),
            scalar => ScalarValue::from_json(scalar).map(Self::Scalar)
                                                    .ok_or(SettingError::MixedSequence { index: 0,
                                                                                         expected: "scalar",
                                                                                         found: kind_name(scalar) }),
        }
    }

    fn from_sequence(items: &[Value]) -> Result<Self, SettingError> {
        if items.iter().all(Value::is_number) {
            return Ok(Self::Gradient(items.iter().filter_map(Value::as_f64).collect()));
        }
        if items.iter().all(is_scalar) {
            return Ok(Self::Steps(items.iter().filter_map(ScalarValue::from_json).collect()));
        }
        if items.iter().all(Value::is_object) {
            let conditions = items.iter()
                                  .filter_map(Value::as_object)
                                  .map(ConditionalParameter::from_map)
                                  .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Conditional(conditions));
        }
        Err(mixed_sequence_error(items))
    }

    /// Atajo de `evaluate_setting`.
    pub fn evaluate(&self, tensor_name: &str, t: f64) -> Option<ScalarValue> {
        evaluate_setting(tensor_name, self, t)
    }
}

impl From<f64> for ParameterSetting {
    fn from(n: f64) -> Self { Self::Scalar(ScalarValue::Number(n)) }
}

impl From<bool> for ParameterSetting {
    fn from(b: bool) -> Self { Self::Scalar(ScalarValue::Bool(b)) }
}

impl From<Vec<f64>> for ParameterSetting {
    fn from(points: Vec<f64>) -> Self { Self::Gradient(points) }
}

impl From<Vec<ConditionalParameter>> for ParameterSetting {
    fn from(conditions: Vec<ConditionalParameter>) -> Self { Self::Conditional(conditions) }
}

impl<'de> Deserialize<'de> for ParameterSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let raw = Value::deserialize(deserializer)?;
        Self::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

/// Valor condicionado al nombre del tensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalParameter {
    pub value: ParameterSetting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ConditionalParameter {
    pub fn new(value: impl Into<ParameterSetting>, filter: Option<&str>) -> Self {
        Self { value: value.into(),
               filter: filter.map(str::to_string) }
    }

    /// `None` o `"*"` aplican a cualquier tensor; en otro caso el filtro debe
    /// ser substring del nombre.
    pub fn matches(&self, tensor_name: &str) -> bool {
        match self.filter.as_deref() {
            None | Some(WILDCARD_FILTER) => true,
            Some(filter) => tensor_name.contains(filter),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Result<Self, SettingError> {
        if let Some(unknown) = map.keys().find(|k| k.as_str() != "value" && k.as_str() != "filter") {
            return Err(SettingError::MalformedConditional(format!("unexpected key `{unknown}`")));
        }
        let value = map.get("value")
                       .ok_or_else(|| SettingError::MalformedConditional("missing `value`".into()))?;
        let filter = match map.get("filter") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(SettingError::MalformedConditional(format!("`filter` must be a string, found {}",
                                                                      kind_name(other))))
            }
        };
        Ok(Self { value: ParameterSetting::from_json(value)?,
                  filter })
    }
}

impl<'de> Deserialize<'de> for ConditionalParameter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_map(&raw).map_err(serde::de::Error::custom)
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::Bool(_) | Value::String(_))
}

// La primera forma válida fija lo esperado; se reporta el primer elemento que difiere.
fn mixed_sequence_error(items: &[Value]) -> SettingError {
    let expected = match items.first() {
        Some(v) if is_scalar(v) => "scalar",
        Some(Value::Object(_)) => "mapping",
        _ => "scalar or mapping",
    };
    let (index, found) = items.iter()
                              .enumerate()
                              .find(|(_, v)| match expected {
                                  "scalar" => !is_scalar(v),
                                  "mapping" => !v.is_object(),
                                  _ => true,
                              })
                              .map(|(i, v)| (i, kind_name(v)))
                              .unwrap_or((0, "unknown"));
    SettingError::MixedSequence { index, expected, found }
}
