//! Colaboradores externos del motor: origen de datos y renderer.
//!
//! Ambos deben ser `Sync`: el despacho puede repartir las entradas a
//! renderizar en un pool de threads.
use std::path::{Path, PathBuf};

use crate::errors::{DataError, RenderError};
use crate::model::{PlotEntry, Table};

/// Resuelve la tabla de datos de una entrada (limpieza incluida).
pub trait DataSource: Sync {
    fn resolve(&self, entry: &PlotEntry) -> Result<Table, DataError>;

    /// Digest opcional de los datos crudos, para fingerprints que dependen
    /// también de los datos. `None` si el origen no lo soporta.
    fn digest(&self, _entry: &PlotEntry) -> Result<Option<String>, DataError> {
        Ok(None)
    }
}

/// Dibuja una entrada y escribe todas sus salidas bajo `output_root`.
/// Devuelve las rutas escritas.
pub trait Renderer: Sync {
    fn render(&self, entry: &PlotEntry, table: &Table, output_root: &Path) -> Result<Vec<PathBuf>, RenderError>;
}

impl<F> DataSource for F where F: Fn(&PlotEntry) -> Result<Table, DataError> + Sync
{
    fn resolve(&self, entry: &PlotEntry) -> Result<Table, DataError> {
        self(entry)
    }
}

impl<F> Renderer for F where F: Fn(&PlotEntry, &Table, &Path) -> Result<Vec<PathBuf>, RenderError> + Sync
{
    fn render(&self, entry: &PlotEntry, table: &Table, output_root: &Path) -> Result<Vec<PathBuf>, RenderError> {
        self(entry, table, output_root)
    }
}
