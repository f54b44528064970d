//! Hash Store: persistencia de `id → fingerprint` más un timestamp global.

mod file;
mod memory;
mod record;

pub use file::{load_record, save_record, CsvHashStore};
pub use memory::InMemoryHashStore;
pub use record::HashRecord;

use chrono::{DateTime, Utc};
use log::warn;

use crate::errors::StoreError;

/// Almacenamiento del último estado conocido de los plots. Inyectable para
/// que los tests sustituyan el archivo por un registro en memoria.
pub trait HashStore {
    /// Carga el registro. Inexistente ⇒ registro vacío con timestamp epoch.
    fn load(&self) -> Result<HashRecord, StoreError>;

    /// Reescribe el registro completo con `now` como `last_modified` y
    /// devuelve ese timestamp.
    fn save(&mut self, record: &HashRecord) -> Result<DateTime<Utc>, StoreError>;

    /// Carga tratando cualquier error como store vacío (fuerza un rerender
    /// completo en vez de abortar).
    fn load_or_empty(&self) -> HashRecord {
        match self.load() {
            Ok(record) => record,
            Err(e) => {
                warn!("{e}; treating hash store as empty (full rerender)");
                HashRecord::empty()
            }
        }
    }
}
