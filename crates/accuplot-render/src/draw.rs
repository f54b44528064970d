//! Composición de la figura sobre cualquier backend de `plotters`.
use std::error::Error;
use std::iter;
use std::ops::Range;

use accuplot_core::model::{AxisLimits, LineStyle, PlotKind, Table, TickFormat};
use accuplot_core::{PlotEntry, RenderError};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::palette;
use crate::scale::AxisTransform;
use crate::series::{build_series, ulp_stats, PlotSeries, SeriesColor, UlpStat};

/// Tamaño de la figura en píxeles.
pub const FIGURE_SIZE: (u32, u32) = (1600, 960);

const FONT: &str = "sans-serif";

/// Figura preparada: series en espacio transformado y rangos de ejes.
pub struct Figure<'a> {
    entry: &'a PlotEntry,
    x: AxisTransform,
    y: AxisTransform,
    series: Vec<PlotSeries>,
    stats: Vec<UlpStat>,
}

impl<'a> Figure<'a> {
    pub fn prepare(entry: &'a PlotEntry, table: &Table) -> Result<Self, RenderError> {
        let p = &entry.params;
        let x = AxisTransform::new(p.xscale, p.xbase);
        let y = AxisTransform::new(p.yscale, p.ybase);
        let series = build_series(entry, table, &x, &y)?;
        let stats = if p.show_ulp_stats_inset { ulp_stats(entry, table)? } else { Vec::new() };
        Ok(Self { entry, x, y, series, stats })
    }

    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    pub fn ranges(&self) -> (Range<f64>, Range<f64>) {
        let p = &self.entry.params;
        let xs = self.series.iter().flat_map(|s| s.points.iter().map(|pt| pt.0));
        let ys = self.series.iter().flat_map(|s| s.points.iter().map(|pt| pt.1));
        (axis_range(xs, p.xlim, &self.x), axis_range(ys, p.ylim, &self.y))
    }

    pub fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>>
        where DB: DrawingBackend,
              DB::ErrorType: 'static
    {
        let entry = self.entry;
        let p = &entry.params;
        root.fill(&WHITE)?;

        let (xr, yr) = self.ranges();
        let mut builder = ChartBuilder::on(&root);
        builder.margin(30).x_label_area_size(70).y_label_area_size(120);
        if let Some(title) = entry.title() {
            builder.caption(title, (FONT, 40));
        }
        let mut chart = builder.build_cartesian_2d(xr.clone(), yr.clone())?;

        let (x, y) = (self.x, self.y);
        let percent = p.yticksformat == Some(TickFormat::Percent);
        let explicit_x = p.xticks.is_some();
        let explicit_y = p.yticks.is_some();
        let xfmt = move |v: &f64| if explicit_x { String::new() } else { format_tick(x.inverse(*v), false) };
        let yfmt = move |v: &f64| if explicit_y { String::new() } else { format_tick(y.inverse(*v), percent) };
        chart.configure_mesh()
             .x_desc(entry.xlabel())
             .y_desc(entry.ylabel())
             .x_label_formatter(&xfmt)
             .y_label_formatter(&yfmt)
             .label_style((FONT, 24))
             .axis_desc_style((FONT, 30))
             .light_line_style(&TRANSPARENT)
             .bold_line_style(&BLACK.mix(0.1))
             .draw()?;

        for s in &self.series {
            let color = match s.color {
                SeriesColor::Palette(i) => palette::deep(i, p.palette_offset),
                SeriesColor::Highlight => palette::HIGHLIGHT,
            };
            let style = color.stroke_width(3);
            let anno = match (entry.kind, s.style) {
                (PlotKind::Scatter, _) => chart.draw_series(s.points.iter().map(|&pt| Circle::new(pt, 4, color.filled())))?,
                (PlotKind::Line, LineStyle::Solid) => chart.draw_series(LineSeries::new(s.points.iter().copied(), style))?,
                (PlotKind::Line, dashed) => {
                    let (size, gap) = dash_pattern(dashed);
                    chart.draw_series(DashedLineSeries::new(s.points.iter().copied(), size, gap, style))?
                }
            };
            anno.label(s.label.clone())
                .legend(move |(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 30, ly)], color.stroke_width(3)));
        }

        let line_font = TextStyle::from((FONT, 26).into_font()).color(&BLACK);
        for line in &p.vertical_lines {
            let Some(xv) = visible(line.position(), p.xlim, &x) else { continue };
            chart.draw_series(DashedLineSeries::new(vec![(xv, yr.start), (xv, yr.end)], 10u32, 6u32, BLACK.stroke_width(2)))?;
            let label_y = yr.start + (yr.end - yr.start) / 2.0;
            chart.draw_series(iter::once(Text::new(line.label().to_string(), (xv, label_y), line_font.clone())))?;
        }
        for line in &p.horizontal_lines {
            let Some(yv) = visible(line.position(), p.ylim, &y) else { continue };
            chart.draw_series(DashedLineSeries::new(vec![(xr.start, yv), (xr.end, yv)], 10u32, 6u32, BLACK.stroke_width(2)))?;
            let label_x = xr.start + (xr.end - xr.start) / 2.0;
            chart.draw_series(iter::once(Text::new(line.label().to_string(), (label_x, yv), line_font.clone())))?;
        }

        let tick_font = TextStyle::from((FONT, 24).into_font()).color(&BLACK);
        for &t in p.xticks.iter().flatten() {
            let Some(tv) = x.forward(t).filter(|v| xr.contains(v)) else { continue };
            chart.draw_series(iter::once(PathElement::new(vec![(tv, yr.start), (tv, yr.end)], BLACK.mix(0.1))))?;
            let style = tick_font.pos(Pos::new(HPos::Center, VPos::Bottom));
            chart.draw_series(iter::once(Text::new(format_tick(t, false), (tv, yr.start), style)))?;
        }
        for &t in p.yticks.iter().flatten() {
            let Some(tv) = y.forward(t).filter(|v| yr.contains(v)) else { continue };
            chart.draw_series(iter::once(PathElement::new(vec![(xr.start, tv), (xr.end, tv)], BLACK.mix(0.1))))?;
            let style = tick_font.pos(Pos::new(HPos::Left, VPos::Center));
            chart.draw_series(iter::once(Text::new(format_tick(t, percent), (xr.start, tv), style)))?;
        }

        if self.series.iter().any(|s| !s.label.is_empty()) {
            chart.configure_series_labels()
                 .background_style(&WHITE.mix(0.8))
                 .border_style(&BLACK.mix(0.3))
                 .label_font((FONT, 26))
                 .position(SeriesLabelPosition::UpperRight)
                 .draw()?;
        }

        let (px, py) = chart.plotting_area().get_pixel_range();
        let (width, height) = (px.end - px.start, py.end - py.start);

        if let Some(text) = &p.outlier_annotation {
            // Caja arriba a la derecha (bajo la leyenda) y corchete rojo en
            // el tope del eje y: los valores continúan fuera del límite.
            let box_w = text.chars().count() as i32 * 20 + 30;
            let right = px.end - width / 20;
            let top = py.start + height / 4;
            root.draw(&Rectangle::new([(right - box_w, top), (right, top + 64)], RGBColor(245, 222, 179).mix(0.8).filled()))?;
            root.draw(&Text::new(text.clone(), (right - box_w + 15, top + 14), (FONT, 36)))?;

            let bx = px.start + width / 50;
            let (y_top, y_low) = (py.start + height * 2 / 100, py.start + height * 12 / 100);
            root.draw(&PathElement::new(vec![(bx, y_low), (bx, y_top)], palette::HIGHLIGHT.stroke_width(3)))?;
            root.draw(&PathElement::new(vec![(bx - 12, y_top), (bx + 12, y_top)], palette::HIGHLIGHT.stroke_width(3)))?;
        }

        if !self.stats.is_empty() {
            let mut lines = vec!["Max ULP:".to_string()];
            lines.extend(self.stats.iter().map(|s| format!("{}: {:.2e}", s.label, s.max)));
            let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
            let x0 = px.start + width * 15 / 100;
            let y0 = py.start + height / 20;
            let x1 = x0 + longest * 17 + 30;
            let y1 = y0 + lines.len() as i32 * 34 + 20;
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], RGBColor(173, 216, 230).mix(0.9).filled()))?;
            root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(2)))?;
            for (i, line) in lines.iter().enumerate() {
                root.draw(&Text::new(line.clone(), (x0 + 15, y0 + 12 + i as i32 * 34), ("monospace", 28)))?;
            }
        }

        root.present()?;
        Ok(())
    }
}

/// Posición transformada de una línea de referencia si cae dentro de los
/// límites del eje.
fn visible(pos: f64, lim: AxisLimits, t: &AxisTransform) -> Option<f64> {
    if !lim.contains(pos) {
        return None;
    }
    t.forward(pos)
}

fn dash_pattern(style: LineStyle) -> (u32, u32) {
    match style {
        LineStyle::Solid => (1, 0),
        LineStyle::Dashed => (14, 8),
        LineStyle::Dotted => (3, 6),
        LineStyle::DashDot => (14, 5),
    }
}

/// Rango del eje en espacio transformado: datos con 2% de margen, salvo
/// los extremos fijados por los límites.
pub fn axis_range(values: impl Iterator<Item = f64>, lim: AxisLimits, t: &AxisTransform) -> Range<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }
    let pad = (hi - lo).abs() * 0.02;
    lo -= pad;
    hi += pad;
    if let Some(m) = lim.min.and_then(|m| t.forward(m)) {
        lo = m;
    }
    if let Some(m) = lim.max.and_then(|m| t.forward(m)) {
        hi = m;
    }
    if hi <= lo {
        let c = lo;
        lo = c - 1.0;
        hi = c + 1.0;
    }
    lo..hi
}

pub fn format_tick(v: f64, percent: bool) -> String {
    if percent {
        return format!("{:.0}%", v * 100.0);
    }
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e4).contains(&a) {
        format!("{v:.0e}")
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accuplot_core::model::ScaleKind;

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(0.25, true), "25%");
        assert_eq!(format_tick(1e6, false), "1e6");
        assert_eq!(format_tick(-1e-5, false), "-1e-5");
        assert_eq!(format_tick(3.0, false), "3");
        assert_eq!(format_tick(0.5, false), "0.50");
        assert_eq!(format_tick(0.0, false), "0");
    }

    #[test]
    fn axis_range_pads_data_and_respects_limits() {
        let lin = AxisTransform::new(ScaleKind::Linear, 10.0);
        let r = axis_range([0.0, 100.0].into_iter(), AxisLimits::default(), &lin);
        assert_eq!(r, -2.0..102.0);
        let r = axis_range([0.0, 100.0].into_iter(), AxisLimits::new(Some(10.0), None), &lin);
        assert_eq!(r, 10.0..102.0);
        let r = axis_range(iter::empty::<f64>(), AxisLimits::default(), &lin);
        assert!(r.start < 0.0 && r.end > 1.0);
        let r = axis_range([5.0].into_iter(), AxisLimits::default(), &lin);
        assert_eq!(r, 4.0..6.0);
    }
}
