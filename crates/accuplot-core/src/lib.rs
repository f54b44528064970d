//! accuplot-core: motor de replot incremental.
//!
//! Flujo de una corrida:
//! `loader` → `PlotEntry`s → `fingerprint` → `HashStore` (fingerprints
//! previos) → `decide` (partición skip/render) → `RenderDispatcher` →
//! persistencia del nuevo `HashRecord`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod loader;
pub mod model;
pub mod store;

pub use engine::{decide, newest_mtime, persisted_record, should_force, CurrentState, DataSource, DispatchReport,
                 EntryOutcome, ReplotPlan, ReplotReason, ReplotSession, RenderDispatcher, Renderer, RunSummary,
                 SessionOptions};
pub use errors::{ConfigError, DataError, RenderError, StoreError};
pub use loader::{load_entries, parse_entries};
pub use model::{fingerprint, fingerprint_all, fingerprint_with_data, Fingerprint, Fingerprints, PlotEntry, PlotKind,
                RenderParams, Table};
pub use store::{CsvHashStore, HashRecord, HashStore, InMemoryHashStore};
