//! accuplot: replot incremental de gráficos de precisión.
//!
//! - `config`: `AppConfig` desde entorno (.env) con overrides de CLI.
//! - `errors`: `AppError`, los fallos que abortan una corrida.
//! - `app`: une el motor (`accuplot-core`) con el origen CSV
//!   (`accuplot-data`) y el renderer `plotters` (`accuplot-render`).

pub mod app;
pub mod config;
pub mod errors;

pub use app::App;
pub use config::AppConfig;
pub use errors::AppError;
