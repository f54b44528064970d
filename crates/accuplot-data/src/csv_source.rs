use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use accuplot_core::{DataError, DataSource, PlotEntry, Table};
use sha2::{Digest, Sha256};

use crate::cleaning::CleaningRules;
use crate::table_csv::parse_table;

/// Resuelve `entry.data` como ruta CSV relativa a `root`.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
    rules: CleaningRules,
}

impl CsvDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), rules: CleaningRules::default() }
    }

    pub fn with_rules(mut self, rules: CleaningRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, entry: &PlotEntry) -> PathBuf {
        self.root.join(&entry.data)
    }

    fn unavailable(entry: &PlotEntry, reason: impl ToString) -> DataError {
        DataError::Unavailable { id: entry.id.clone(), reference: entry.data.clone(), reason: reason.to_string() }
    }

    /// Tabla cruda, sin limpieza.
    pub fn read_raw(&self, entry: &PlotEntry) -> Result<Table, DataError> {
        let path = self.path_for(entry);
        let file = File::open(&path).map_err(|e| Self::unavailable(entry, format!("{}: {e}", path.display())))?;
        parse_table(BufReader::new(file)).map_err(|e| DataError::Malformed { id: entry.id.clone(), reason: e.to_string() })
    }
}

impl DataSource for CsvDataSource {
    fn resolve(&self, entry: &PlotEntry) -> Result<Table, DataError> {
        let raw = self.read_raw(entry)?;
        if let Some(missing) = entry.required_columns().into_iter().find(|c| !raw.has_column(c)) {
            return Err(DataError::MissingColumn { id: entry.id.clone(), column: missing.to_string() });
        }
        Ok(self.rules.apply(entry, &raw))
    }

    /// sha256 de los bytes del archivo de datos.
    fn digest(&self, entry: &PlotEntry) -> Result<Option<String>, DataError> {
        let path = self.path_for(entry);
        let bytes = fs::read(&path).map_err(|e| Self::unavailable(entry, format!("{}: {e}", path.display())))?;
        Ok(Some(format!("{:x}", Sha256::digest(&bytes))))
    }
}
