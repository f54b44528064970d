//! Parámetros de render tipados con sus defaults.
//!
//! | clave | default |
//! |---|---|
//! | `xscale` / `yscale` | `symlog` / `asinh` |
//! | `xbase` / `ybase` | 10 |
//! | `xlim` / `ylim` | sin límites |
//! | `palette_offset` | 0 |
//! | `reference_suffix` | `(torch)` |
//!
//! Las claves desconocidas se conservan en `extra` (y entran en el
//! fingerprint) para que un typo no deje el cache desactualizado en silencio.
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_REFERENCE_SUFFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Log,
    Symlog,
    Asinh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickFormat {
    Percent,
}

/// Límites de eje `[min, max]`; `null` deja el extremo libre.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "LimitPair", into = "LimitPair")]
pub struct AxisLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct LimitPair(Option<f64>, Option<f64>);

impl From<LimitPair> for AxisLimits {
    fn from(p: LimitPair) -> Self {
        Self { min: p.0, max: p.1 }
    }
}

impl From<AxisLimits> for LimitPair {
    fn from(l: AxisLimits) -> Self {
        LimitPair(l.min, l.max)
    }
}

impl AxisLimits {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// `true` si `v` cae dentro de los límites configurados.
    pub fn contains(&self, v: f64) -> bool {
        self.min.map_or(true, |m| v >= m) && self.max.map_or(true, |m| v <= m)
    }
}

/// Línea de referencia `[posición, etiqueta]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine(pub f64, #[serde(default)] pub String);

impl ReferenceLine {
    pub fn position(&self) -> f64 {
        self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub xscale: ScaleKind,
    pub xbase: f64,
    pub yscale: ScaleKind,
    pub ybase: f64,
    pub xlim: AxisLimits,
    pub ylim: AxisLimits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xticks: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yticks: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yticksformat: Option<TickFormat>,
    pub palette_offset: usize,
    #[serde(deserialize_with = "presence_flag", skip_serializing_if = "std::ops::Not::not")]
    pub keep_subnormals: bool,
    pub vertical_lines: Vec<ReferenceLine>,
    pub horizontal_lines: Vec<ReferenceLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_annotation: Option<String>,
    pub show_ulp_stats_inset: bool,
    pub reference_suffix: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self { title: None,
               xscale: ScaleKind::Symlog,
               xbase: 10.0,
               yscale: ScaleKind::Asinh,
               ybase: 10.0,
               xlim: AxisLimits::default(),
               ylim: AxisLimits::default(),
               xticks: None,
               yticks: None,
               xlabel: None,
               ylabel: None,
               yticksformat: None,
               palette_offset: 0,
               keep_subnormals: false,
               vertical_lines: Vec::new(),
               horizontal_lines: Vec::new(),
               outlier_annotation: None,
               show_ulp_stats_inset: false,
               reference_suffix: DEFAULT_REFERENCE_SUFFIX.to_string(),
               extra: BTreeMap::new() }
    }
}

impl RenderParams {
    /// Claves desconocidas que no son anotaciones volátiles (`_...`).
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str).filter(|k| !k.starts_with('_'))
    }
}

/// `keep_subnormals` se activa por presencia de la clave: el valor se ignora,
/// incluso `false`.
fn presence_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where D: Deserializer<'de>
{
    Value::deserialize(deserializer)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_follow_table() {
        let p: RenderParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p, RenderParams::default());
        assert_eq!(p.xscale, ScaleKind::Symlog);
        assert_eq!(p.yscale, ScaleKind::Asinh);
        assert_eq!(p.xbase, 10.0);
        assert_eq!(p.reference_suffix, "(torch)");
        assert!(p.xlim.is_unbounded());
    }

    #[test]
    fn parses_full_param_set() {
        let p: RenderParams = serde_json::from_value(json!({
            "title": "{} accuracy",
            "xscale": "linear",
            "ybase": 2,
            "xlim": [null, 100],
            "ylim": [0, 1e6],
            "yticks": [0, 1, 10],
            "yticksformat": "percent",
            "palette_offset": 2,
            "keep_subnormals": null,
            "vertical_lines": [[1.0, "overflow"]],
            "outlier_annotation": "capped",
            "show_ulp_stats_inset": true,
            "mystery": 3
        })).unwrap();
        assert_eq!(p.xscale, ScaleKind::Linear);
        assert_eq!(p.ybase, 2.0);
        assert_eq!(p.xlim, AxisLimits::new(None, Some(100.0)));
        assert_eq!(p.ylim.max, Some(1e6));
        assert_eq!(p.yticksformat, Some(TickFormat::Percent));
        assert!(p.keep_subnormals);
        assert_eq!(p.vertical_lines[0].label(), "overflow");
        assert!(p.show_ulp_stats_inset);
        assert_eq!(p.unknown_keys().collect::<Vec<_>>(), vec!["mystery"]);
    }

    #[test]
    fn keep_subnormals_is_enabled_by_key_presence() {
        let explicit_false: RenderParams = serde_json::from_value(json!({ "keep_subnormals": false })).unwrap();
        assert!(explicit_false.keep_subnormals);
        let absent: RenderParams = serde_json::from_value(json!({})).unwrap();
        assert!(!absent.keep_subnormals);

        let back: RenderParams = serde_json::from_value(serde_json::to_value(&absent).unwrap()).unwrap();
        assert!(!back.keep_subnormals);
        let back: RenderParams = serde_json::from_value(serde_json::to_value(&explicit_false).unwrap()).unwrap();
        assert!(back.keep_subnormals);
    }

    #[test]
    fn limits_contain() {
        let l = AxisLimits::new(Some(-1.0), None);
        assert!(l.contains(-1.0));
        assert!(l.contains(1e300));
        assert!(!l.contains(-2.0));
    }
}
