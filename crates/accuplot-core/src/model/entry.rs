//! `PlotEntry`: un gráfico configurado.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::params::RenderParams;

/// Tipo de gráfico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    #[default]
    #[serde(alias = "lineplot")]
    Line,
    #[serde(alias = "scatterplot")]
    Scatter,
}

/// Estilo de trazo, en la notación corta de matplotlib.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    #[serde(rename = "-", alias = "solid")]
    Solid,
    #[serde(rename = "--", alias = "dashed")]
    Dashed,
    #[serde(rename = ":", alias = "dotted")]
    Dotted,
    #[serde(rename = "-.", alias = "dashdot")]
    DashDot,
}

/// Serie a dibujar: columna y, sufijo de etiqueta y estilo.
/// En el JSON es una terna `[field, suffix, style]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SeriesTriple", into = "SeriesTriple")]
pub struct SeriesDef {
    pub field: String,
    pub suffix: String,
    pub style: LineStyle,
}

#[derive(Serialize, Deserialize)]
struct SeriesTriple(String, #[serde(default)] String, #[serde(default)] LineStyle);

impl From<SeriesTriple> for SeriesDef {
    fn from(t: SeriesTriple) -> Self {
        Self { field: t.0, suffix: t.1, style: t.2 }
    }
}

impl From<SeriesDef> for SeriesTriple {
    fn from(s: SeriesDef) -> Self {
        SeriesTriple(s.field, s.suffix, s.style)
    }
}

impl SeriesDef {
    pub fn new(field: impl Into<String>, suffix: impl Into<String>, style: LineStyle) -> Self {
        Self { field: field.into(), suffix: suffix.into(), style }
    }

    /// Etiqueta de leyenda para un valor de hue: `"<hue> <suffix>"`.
    pub fn label_for(&self, hue_value: &str) -> String {
        if self.suffix.is_empty() {
            hue_value.to_string()
        } else {
            format!("{hue_value} {}", self.suffix)
        }
    }
}

/// Entrada de configuración normalizada.
///
/// Invariantes (validadas por el loader):
/// - `id` es único y no vacío.
/// - `ynames` no está vacío.
/// - la entrada sólo es elegible para render si `outputs` no está vacío.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Referencia opaca para el `DataSource` (p.ej. ruta CSV relativa).
    pub data: String,
    pub xname: String,
    pub ynames: Vec<SeriesDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: PlotKind,
    #[serde(rename = "plot_params", default)]
    pub params: RenderParams,
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
    /// Claves no reconocidas (typos incluidos): entran en el fingerprint.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PlotEntry {
    /// Nombre corto para títulos; cae al `id`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn is_renderable(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Título con `{}` sustituido por el nombre corto.
    pub fn title(&self) -> Option<String> {
        self.params.title.as_ref().map(|t| t.replacen("{}", self.display_name(), 1))
    }

    pub fn xlabel(&self) -> &str {
        self.params.xlabel.as_deref().unwrap_or(&self.xname)
    }

    pub fn ylabel(&self) -> &str {
        self.params
            .ylabel
            .as_deref()
            .or_else(|| self.ynames.first().map(|s| s.field.as_str()))
            .unwrap_or_default()
    }

    /// Claves de primer nivel desconocidas, sin las volátiles (`_...`).
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str).filter(|k| !k.starts_with('_'))
    }

    /// Columnas que el renderer necesita en la tabla.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.xname.as_str()];
        cols.extend(self.ynames.iter().map(|s| s.field.as_str()));
        if let Some(h) = &self.hue {
            cols.push(h.as_str());
        }
        cols.dedup();
        cols
    }

    /// Representación JSON usada para fingerprinting. La serialización de
    /// `PlotEntry` no falla: todas las claves son `String`.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
