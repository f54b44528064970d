//! Limpieza previa al render. No participa del fingerprint salvo a través
//! de los parámetros de la entrada (`keep_subnormals`, `xlim`).
use accuplot_core::constants::MIN_NORMAL_F32;
use accuplot_core::model::{AxisLimits, Table};
use accuplot_core::PlotEntry;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CleaningRules {
    /// Filas con valor no finito en esta columna se descartan.
    pub finite_column: Option<String>,
    /// Columnas de input cuyo valor absoluto debe ser normal.
    pub subnormal_columns: Vec<String>,
    pub min_normal: f64,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self { finite_column: Some("base_x".into()),
               subnormal_columns: vec!["base_x".into(), "base_y".into()],
               min_normal: MIN_NORMAL_F32 }
    }
}

impl CleaningRules {
    /// Sin filtros (salvo los límites de x de la entrada).
    pub fn none() -> Self {
        Self { finite_column: None, subnormal_columns: Vec::new(), min_normal: 0.0 }
    }

    /// Aplica, en orden: no finitos, subnormales (salvo `keep_subnormals`) y
    /// `xlim` sobre la columna x. Las columnas ausentes no filtran.
    pub fn apply(&self, entry: &PlotEntry, table: &Table) -> Table {
        let mut keep = vec![true; table.len()];

        if let Some(values) = self.finite_column.as_deref().and_then(|c| table.numeric(c)) {
            mask_where(&mut keep, values, |v| v.is_finite());
        }
        if !entry.params.keep_subnormals {
            for col in &self.subnormal_columns {
                if let Some(values) = table.numeric(col) {
                    mask_where(&mut keep, values, |v| v.abs() >= self.min_normal);
                }
            }
        }
        if let Some(values) = table.numeric(&entry.xname) {
            let lim: AxisLimits = entry.params.xlim;
            if !lim.is_unbounded() {
                mask_where(&mut keep, values, |v| lim.contains(v));
            }
        }

        let kept = keep.iter().filter(|k| **k).count();
        if kept != table.len() {
            debug!("plot {}: cleaning dropped {} of {} rows", entry.id, table.len() - kept, table.len());
        }
        table.filter_rows(&keep)
    }
}

fn mask_where(keep: &mut [bool], values: &[f64], pred: impl Fn(f64) -> bool) {
    for (k, v) in keep.iter_mut().zip(values) {
        *k = *k && pred(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accuplot_core::model::Column;
    use serde_json::json;

    fn entry(params: serde_json::Value) -> PlotEntry {
        serde_json::from_value(json!({
            "id": "exp_f32", "data": "exp.csv", "xname": "base_x",
            "ynames": [["max_ulp_error", "", "-"]], "plot_params": params
        })).unwrap()
    }

    fn table() -> Table {
        let mut t = Table::new();
        t.push_column("base_x", Column::Numeric(vec![f64::NAN, 1e-40, 0.5, 2.0, f64::INFINITY, 100.0])).unwrap();
        t.push_column("base_y", Column::Numeric(vec![1.0, 1.0, 1e-39, 1.0, 1.0, 1.0])).unwrap();
        t.push_column("max_ulp_error", Column::Numeric(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        t
    }

    #[test]
    fn drops_non_finite_and_subnormal_rows() {
        let cleaned = CleaningRules::default().apply(&entry(json!({})), &table());
        assert_eq!(cleaned.numeric("max_ulp_error").unwrap(), &[3.0, 5.0]);
    }

    #[test]
    fn keep_subnormals_skips_that_filter() {
        let cleaned = CleaningRules::default().apply(&entry(json!({ "keep_subnormals": true })), &table());
        assert_eq!(cleaned.numeric("max_ulp_error").unwrap(), &[1.0, 2.0, 3.0, 5.0]);
    }

    #[test]
    fn xlim_trims_rows() {
        let cleaned = CleaningRules::default().apply(&entry(json!({ "xlim": [null, 10] })), &table());
        assert_eq!(cleaned.numeric("max_ulp_error").unwrap(), &[3.0]);
        let untouched = CleaningRules::none().apply(&entry(json!({})), &table());
        assert_eq!(untouched.len(), 6);
    }
}
