//! Modelo: entradas de plot, parámetros de render, fingerprints y tablas.

mod entry;
mod fingerprint;
mod params;
mod table;

pub use entry::{LineStyle, PlotEntry, PlotKind, SeriesDef};
pub use fingerprint::{fingerprint, fingerprint_all, fingerprint_with_data, Fingerprint, Fingerprints};
pub use params::{AxisLimits, ReferenceLine, RenderParams, ScaleKind, TickFormat};
pub use table::{Column, Table};
