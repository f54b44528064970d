//! accuplot-data: origen de datos CSV para el motor de replot.
//!
//! - `parse_table`: CSV → `Table` (columnas numéricas o de texto).
//! - `CleaningRules`: filtros previos al render (no finitos, subnormales,
//!   límites de x).
//! - `CsvDataSource`: implementación de `DataSource` sobre un directorio de
//!   resultados.
pub mod cleaning;
pub mod csv_source;
pub mod table_csv;

pub use cleaning::CleaningRules;
pub use csv_source::CsvDataSource;
pub use table_csv::{parse_table, TableParseError};
