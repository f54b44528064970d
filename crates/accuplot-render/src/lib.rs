//! accuplot-render: renderer `plotters` para el motor de replot.
//!
//! Capa fina sobre `plotters`: escalas (`scale`), agrupación y deduplicación
//! de series (`series`), dibujado (`draw`) y escritura de salidas
//! (`output`).
pub mod draw;
pub mod output;
pub mod palette;
pub mod scale;
pub mod series;

pub use output::{ImageFormat, PlottersRenderer};
pub use scale::AxisTransform;
pub use series::{build_series, ulp_stats, PlotSeries, SeriesColor, UlpStat};
