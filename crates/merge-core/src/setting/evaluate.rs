//! Evaluación de un `ParameterSetting` para un tensor y una posición `t`.

use super::parameter::ParameterSetting;
use super::value::ScalarValue;

/// Evalúa `setting` para `tensor_name` en la posición `t`.
///
/// Función pura: el mismo `(tensor_name, setting, t)` produce siempre el mismo
/// resultado. `t` se acota a `[0, 1]` (NaN cuenta como 0), de modo que los
/// gradientes nunca extrapolan más allá de sus extremos. Devuelve `None` para
/// secuencias vacías y para listas condicionales sin filtro coincidente; en ese
/// caso no se continúa con ningún otro valor.
pub fn evaluate_setting(tensor_name: &str, setting: &ParameterSetting, t: f64) -> Option<ScalarValue> {
    match setting {
        ParameterSetting::Scalar(value) => Some(value.clone()),
        ParameterSetting::Gradient(points) => interpolate(points, t).map(ScalarValue::Number),
        ParameterSetting::Steps(steps) => {
            let last = steps.len().checked_sub(1)?;
            steps.get(lower_index(last, t)).cloned()
        }
        ParameterSetting::Conditional(conditions) => {
            // Short-circuit: el primer filtro que coincide decide, aunque evalúe a None.
            let selected = conditions.iter().find(|c| c.matches(tensor_name))?;
            evaluate_setting(tensor_name, &selected.value, t)
        }
    }
}

fn interpolate(points: &[f64], t: f64) -> Option<f64> {
    let last = points.len().checked_sub(1)?;
    let scaled = clamp_position(t) * last as f64;
    let i0 = lower_index(last, t);
    let i1 = (i0 + 1).min(last);
    let frac = scaled - i0 as f64;
    Some((1.0 - frac) * points[i0] + frac * points[i1])
}

fn lower_index(last: usize, t: f64) -> usize {
    ((clamp_position(t) * last as f64).floor() as usize).min(last)
}

fn clamp_position(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::ConditionalParameter;

    fn number(setting: &ParameterSetting, tensor: &str, t: f64) -> f64 {
        evaluate_setting(tensor, setting, t).and_then(|v| v.as_f64()).expect("numeric result")
    }

    #[test]
    fn scalar_ignores_position() {
        let s = ParameterSetting::from(0.4);
        assert_eq!(number(&s, "x", 0.0), 0.4);
        assert_eq!(number(&s, "x", 0.9), 0.4);
        let text = ParameterSetting::Scalar(ScalarValue::Text("slerp".into()));
        assert_eq!(evaluate_setting("x", &text, 0.5), Some(ScalarValue::Text("slerp".into())));
    }

    #[test]
    fn gradient_hits_endpoints_exactly() {
        let s = ParameterSetting::Gradient(vec![0.1, 0.7, 0.3, 0.9]);
        assert_eq!(number(&s, "x", 0.0), 0.1);
        assert_eq!(number(&s, "x", 1.0), 0.9);
    }

    #[test]
    fn gradient_interpolates_between_control_points() {
        let s = ParameterSetting::Gradient(vec![0.0, 1.0, 0.0]);
        assert!((number(&s, "x", 0.25) - 0.5).abs() < 1e-12);
        assert!((number(&s, "x", 0.5) - 1.0).abs() < 1e-12);
        assert!((number(&s, "x", 0.75) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn gradient_does_not_extrapolate() {
        let s = ParameterSetting::Gradient(vec![0.2, 0.8]);
        assert_eq!(number(&s, "x", -1.0), 0.2);
        assert_eq!(number(&s, "x", 3.0), 0.8);
        assert_eq!(number(&s, "x", f64::NAN), 0.2);
    }

    #[test]
    fn single_point_gradient_is_constant() {
        let s = ParameterSetting::Gradient(vec![0.6]);
        assert_eq!(number(&s, "x", 0.0), 0.6);
        assert_eq!(number(&s, "x", 0.7), 0.6);
    }

    #[test]
    fn empty_sequences_evaluate_to_none() {
        assert_eq!(evaluate_setting("x", &ParameterSetting::Gradient(vec![]), 0.5), None);
        assert_eq!(evaluate_setting("x", &ParameterSetting::Steps(vec![]), 0.5), None);
        assert_eq!(evaluate_setting("x", &ParameterSetting::Conditional(vec![]), 0.5), None);
    }

    #[test]
    fn steps_pick_nearest_earlier_element() {
        let s = ParameterSetting::Steps(vec![ScalarValue::from("x"), ScalarValue::from("y"), ScalarValue::from("z")]);
        assert_eq!(evaluate_setting("t", &s, 0.0), Some(ScalarValue::from("x")));
        assert_eq!(evaluate_setting("t", &s, 0.49), Some(ScalarValue::from("x")));
        assert_eq!(evaluate_setting("t", &s, 0.5), Some(ScalarValue::from("y")));
        assert_eq!(evaluate_setting("t", &s, 0.99), Some(ScalarValue::from("y")));
        assert_eq!(evaluate_setting("t", &s, 1.0), Some(ScalarValue::from("z")));
    }

    #[test]
    fn conditional_first_match_wins() {
        let s = ParameterSetting::Conditional(vec![ConditionalParameter::new(1.0, Some("attn")),
                                                   ConditionalParameter::new(2.0, Some("*"))]);
        assert_eq!(number(&s, "model.layers.3.self_attn.o_proj.weight", 0.5), 1.0);
        assert_eq!(number(&s, "model.layers.3.mlp.up_proj.weight", 0.5), 2.0);
    }

    #[test]
    fn conditional_without_match_is_none() {
        let s = ParameterSetting::Conditional(vec![ConditionalParameter::new(1.0, Some("attn"))]);
        assert_eq!(evaluate_setting("mlp.down_proj", &s, 0.5), None);
    }

    #[test]
    fn matched_conditional_returns_its_none_without_falling_through() {
        let inner = ParameterSetting::Conditional(vec![ConditionalParameter::new(5.0, Some("q_proj"))]);
        let s = ParameterSetting::Conditional(vec![ConditionalParameter::new(inner, Some("attn")),
                                                   ConditionalParameter::new(9.0, None)]);
        assert_eq!(evaluate_setting("self_attn.k_proj", &s, 0.0), None);
        assert_eq!(number(&s, "self_attn.q_proj", 0.0), 5.0);
        assert_eq!(number(&s, "mlp.gate_proj", 0.0), 9.0);
    }

    #[test]
    fn conditional_value_gradient_uses_same_position() {
        let s = ParameterSetting::Conditional(vec![ConditionalParameter::new(vec![0.0, 1.0], Some("mlp"))]);
        assert!((number(&s, "mlp.up_proj", 0.3) - 0.3).abs() < 1e-12);
    }
}
