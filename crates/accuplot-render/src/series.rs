//! Series a dibujar a partir de la tabla limpia.
//!
//! Reglas:
//! - con `hue`, una serie por valor (orden de aparición), etiquetada
//!   `"<hue> <suffix>"` y coloreada por índice de hue;
//! - la primera serie cuyo sufijo es el de referencia se dibuja resaltada y
//!   las siguientes con el mismo sufijo se omiten;
//! - en plots de línea, los x repetidos se promedian y los puntos se ordenan
//!   por x.
use std::collections::BTreeMap;

use accuplot_core::model::{LineStyle, PlotKind, Table};
use accuplot_core::{PlotEntry, RenderError};
use indexmap::IndexMap;

use crate::scale::AxisTransform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    Palette(usize),
    Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub color: SeriesColor,
    pub style: LineStyle,
    /// Puntos en espacio transformado.
    pub points: Vec<(f64, f64)>,
}

fn missing(entry: &PlotEntry, column: &str) -> RenderError {
    RenderError::MissingColumn { id: entry.id.clone(), column: column.to_string() }
}

/// Índices de fila por valor de hue, en orden de aparición.
fn hue_groups(entry: &PlotEntry, table: &Table) -> Result<IndexMap<String, Vec<usize>>, RenderError> {
    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    match &entry.hue {
        Some(h) => {
            let labels = table.labels(h).ok_or_else(|| missing(entry, h))?;
            for (i, l) in labels.into_iter().enumerate() {
                groups.entry(l).or_default().push(i);
            }
        }
        None => {
            groups.insert(String::new(), (0..table.len()).collect());
        }
    }
    Ok(groups)
}

pub fn build_series(entry: &PlotEntry,
                    table: &Table,
                    x_axis: &AxisTransform,
                    y_axis: &AxisTransform)
                    -> Result<Vec<PlotSeries>, RenderError> {
    let xs = table.numeric(&entry.xname).ok_or_else(|| missing(entry, &entry.xname))?;
    let groups = hue_groups(entry, table)?;
    let reference = entry.params.reference_suffix.as_str();

    let mut out = Vec::new();
    let mut reference_drawn = false;
    for (def_index, def) in entry.ynames.iter().enumerate() {
        let highlight = !reference.is_empty() && def.suffix == reference;
        if highlight && reference_drawn {
            continue;
        }
        reference_drawn |= highlight;

        let ys = table.numeric(&def.field).ok_or_else(|| missing(entry, &def.field))?;
        for (hue_index, (hue_value, rows)) in groups.iter().enumerate() {
            let points: Vec<(f64, f64)> = rows.iter()
                                              .filter_map(|&i| Some((x_axis.forward(xs[i])?, y_axis.forward(ys[i])?)))
                                              .collect();
            let points = match entry.kind {
                PlotKind::Line => mean_by_x(points),
                PlotKind::Scatter => points,
            };
            let (label, color_index) = match &entry.hue {
                Some(_) => (def.label_for(hue_value), hue_index),
                None => (def.field.clone(), def_index),
            };
            let color = if highlight { SeriesColor::Highlight } else { SeriesColor::Palette(color_index) };
            out.push(PlotSeries { label, color, style: def.style, points });
        }
    }
    Ok(out)
}

/// Agrupa por x (bit a bit) promediando y; resultado ordenado por x.
fn mean_by_x(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let mut acc: BTreeMap<OrdF64, (f64, usize)> = BTreeMap::new();
    for (x, y) in points {
        let e = acc.entry(OrdF64(x)).or_insert((0.0, 0));
        e.0 += y;
        e.1 += 1;
    }
    acc.into_iter().map(|(x, (sum, n))| (x.0, sum / n as f64)).collect()
}

/// Envoltorio con orden total; sólo se usa con valores finitos.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrdF64(f64);

impl Eq for OrdF64 {}

impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UlpStat {
    pub label: String,
    pub max: f64,
    pub mean: f64,
}

/// Máximo y media del primer campo y por valor de hue, ordenado por máximo
/// descendente. Vacío si la entrada no tiene `hue`.
pub fn ulp_stats(entry: &PlotEntry, table: &Table) -> Result<Vec<UlpStat>, RenderError> {
    if entry.hue.is_none() {
        return Ok(Vec::new());
    }
    let Some(first) = entry.ynames.first() else {
        return Ok(Vec::new());
    };
    let ys = table.numeric(&first.field).ok_or_else(|| missing(entry, &first.field))?;
    let mut stats: Vec<UlpStat> = hue_groups(entry, table)?
        .into_iter()
        .filter_map(|(label, rows)| {
            let values: Vec<f64> = rows.iter().map(|&i| ys[i]).filter(|v| !v.is_nan()).collect();
            if values.is_empty() {
                return None;
            }
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some(UlpStat { label, max, mean })
        })
        .collect();
    stats.sort_by(|a, b| b.max.total_cmp(&a.max));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accuplot_core::model::{Column, ScaleKind};
    use serde_json::json;

    fn linear() -> AxisTransform {
        AxisTransform::new(ScaleKind::Linear, 10.0)
    }

    fn table() -> Table {
        let mut t = Table::new();
        t.push_column("operation", Column::Text(vec!["add".into(), "add".into(), "mul".into(), "add".into()])).unwrap();
        t.push_column("base_x", Column::Numeric(vec![2.0, 1.0, 1.0, 1.0])).unwrap();
        t.push_column("max_ulp_error", Column::Numeric(vec![4.0, 1.0, 9.0, 3.0])).unwrap();
        t.push_column("torch_ulp_error", Column::Numeric(vec![0.0, 0.0, 0.0, 0.0])).unwrap();
        t
    }

    fn entry(ynames: serde_json::Value) -> PlotEntry {
        serde_json::from_value(json!({
            "id": "ops", "data": "ops.csv", "xname": "base_x", "hue": "operation",
            "ynames": ynames, "outputs": ["ops.svg"]
        })).unwrap()
    }

    #[test]
    fn groups_by_hue_and_averages_repeated_x() {
        let e = entry(json!([["max_ulp_error", "(max)", "-"]]));
        let s = build_series(&e, &table(), &linear(), &linear()).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].label, "add (max)");
        assert_eq!(s[0].points, vec![(1.0, 2.0), (2.0, 4.0)]);
        assert_eq!(s[1].label, "mul (max)");
        assert_eq!(s[1].color, SeriesColor::Palette(1));
    }

    #[test]
    fn reference_series_drawn_once_and_highlighted() {
        let e = entry(json!([
            ["torch_ulp_error", "(torch)", "-"],
            ["max_ulp_error", "(max)", "--"],
            ["torch_ulp_error", "(torch)", ":"]
        ]));
        let s = build_series(&e, &table(), &linear(), &linear()).unwrap();
        let torch: Vec<_> = s.iter().filter(|p| p.label.ends_with("(torch)")).collect();
        assert_eq!(torch.len(), 2, "one per hue value, from the first reference def only");
        assert!(torch.iter().all(|p| p.color == SeriesColor::Highlight && p.style == LineStyle::Solid));
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn missing_y_column_is_render_error() {
        let e = entry(json!([["nope", "", "-"]]));
        let err = build_series(&e, &table(), &linear(), &linear()).unwrap_err();
        assert_eq!(err, RenderError::MissingColumn { id: "ops".into(), column: "nope".into() });
    }

    #[test]
    fn ulp_stats_sorted_by_max() {
        let e = entry(json!([["max_ulp_error", "(max)", "-"]]));
        let stats = ulp_stats(&e, &table()).unwrap();
        assert_eq!(stats[0], UlpStat { label: "mul".into(), max: 9.0, mean: 9.0 });
        assert_eq!(stats[1].label, "add");
        assert_eq!(stats[1].max, 4.0);
        assert!((stats[1].mean - 8.0 / 3.0).abs() < 1e-12);
    }
}
