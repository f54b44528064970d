//! Tabla columnar mínima entregada por el `DataSource` al renderer.
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain(&self, mask: &[bool]) -> Column {
        fn pick<T: Clone>(v: &[T], mask: &[bool]) -> Vec<T> {
            v.iter().zip(mask).filter(|(_, keep)| **keep).map(|(x, _)| x.clone()).collect()
        }
        match self {
            Column::Numeric(v) => Column::Numeric(pick(v, mask)),
            Column::Text(v) => Column::Text(pick(v, mask)),
        }
    }
}

/// Columnas nombradas de igual longitud, en orden de inserción.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega una columna. Devuelve `Err` con el nombre si la longitud no
    /// coincide con las columnas existentes.
    pub fn push_column(&mut self, name: impl Into<String>, column: Column) -> Result<(), String> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(name);
        }
        self.rows = column.len();
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Vista textual de una columna (las numéricas se formatean).
    pub fn labels(&self, name: &str) -> Option<Vec<String>> {
        match self.columns.get(name)? {
            Column::Text(v) => Some(v.clone()),
            Column::Numeric(v) => Some(v.iter().map(|x| x.to_string()).collect()),
        }
    }

    /// Nueva tabla con las filas cuyo `mask[i]` es `true`.
    pub fn filter_rows(&self, mask: &[bool]) -> Table {
        let columns: IndexMap<String, Column> =
            self.columns.iter().map(|(k, c)| (k.clone(), c.retain(mask))).collect();
        let rows = mask.iter().take(self.rows).filter(|k| **k).count();
        Table { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new();
        t.push_column("base_x", Column::Numeric(vec![1.0, f64::NAN, 3.0])).unwrap();
        t.push_column("operation", Column::Text(vec!["add".into(), "add".into(), "mul".into()])).unwrap();
        t
    }

    #[test]
    fn rejects_ragged_columns() {
        let mut t = sample();
        assert_eq!(t.push_column("y", Column::Numeric(vec![1.0])), Err("y".to_string()));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn filter_rows_keeps_alignment() {
        let t = sample().filter_rows(&[true, false, true]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.numeric("base_x"), Some(&[1.0, 3.0][..]));
        assert_eq!(t.labels("operation").unwrap(), vec!["add", "mul"]);
        assert!(t.numeric("operation").is_none());
    }
}
