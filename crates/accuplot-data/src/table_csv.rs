use std::io::Read;

use accuplot_core::model::{Column, Table};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableParseError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("column `{0}` has inconsistent length")]
    Ragged(String),
}

/// Parsea un CSV con cabecera. Una columna es numérica si todas sus celdas no
/// vacías parsean como `f64` (`nan`, `inf` incluidos); las vacías son NaN.
pub fn parse_table<R: Read>(reader: R) -> Result<Table, TableParseError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(record.get(i).unwrap_or_default().to_string());
        }
    }

    let mut table = Table::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        if table.has_column(&name) {
            return Err(TableParseError::DuplicateColumn(name));
        }
        table.push_column(name, to_column(raw)).map_err(TableParseError::Ragged)?;
    }
    Ok(table)
}

fn to_column(raw: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = raw.iter()
                                      .map(|s| if s.is_empty() { Some(f64::NAN) } else { s.parse::<f64>().ok() })
                                      .collect();
    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Text(raw),
    }
}
