//! Escritura de salidas: una sola figura por entrada, volcada a todas sus
//! rutas con contenido idéntico.
use std::fs;
use std::path::{Path, PathBuf};

use accuplot_core::model::Table;
use accuplot_core::{PlotEntry, RenderError, Renderer};
use plotters::prelude::*;

use crate::draw::{Figure, FIGURE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    /// Formato según la extensión (sin distinguir mayúsculas).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Renderer basado en `plotters` (SVG y PNG).
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    pub size: (u32, u32),
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self { size: FIGURE_SIZE }
    }
}

impl PlottersRenderer {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }

    fn render_svg(&self, entry: &PlotEntry, figure: &Figure<'_>) -> Result<String, RenderError> {
        let mut doc = String::new();
        {
            let root = SVGBackend::with_string(&mut doc, self.size).into_drawing_area();
            figure.draw(root).map_err(|e| backend_error(entry, e.to_string()))?;
        }
        Ok(doc)
    }

    fn render_png(&self, entry: &PlotEntry, figure: &Figure<'_>, path: &Path) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        figure.draw(root).map_err(|e| backend_error(entry, e.to_string()))
    }
}

impl Renderer for PlottersRenderer {
    fn render(&self, entry: &PlotEntry, table: &Table, output_root: &Path) -> Result<Vec<PathBuf>, RenderError> {
        if entry.outputs.is_empty() {
            return Err(RenderError::NoOutputs { id: entry.id.clone() });
        }
        // Una ruta repetida se escribe una sola vez: copiar un archivo sobre
        // sí mismo lo trunca.
        let mut targets: Vec<PathBuf> = Vec::with_capacity(entry.outputs.len());
        for target in entry.outputs.iter().map(|o| output_root.join(o)) {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }

        let mut svg = Vec::new();
        let mut png = Vec::new();
        for target in &targets {
            match ImageFormat::from_path(target) {
                Some(ImageFormat::Svg) => svg.push(target),
                Some(ImageFormat::Png) => png.push(target),
                None => return Err(output_error(entry, target, "unsupported image format (expected .svg or .png)")),
            }
            if let Some(dir) = target.parent() {
                fs::create_dir_all(dir).map_err(|e| output_error(entry, target, e))?;
            }
        }

        let figure = Figure::prepare(entry, table)?;
        log::debug!("[{}] drawing {} series", entry.id, figure.series().len());

        if !svg.is_empty() {
            let doc = self.render_svg(entry, &figure)?;
            for target in svg {
                fs::write(target, &doc).map_err(|e| output_error(entry, target, e))?;
            }
        }
        if let Some((first, rest)) = png.split_first() {
            self.render_png(entry, &figure, first)?;
            for target in rest {
                fs::copy(first, target).map_err(|e| output_error(entry, target, e))?;
            }
        }
        Ok(targets)
    }
}

fn backend_error(entry: &PlotEntry, reason: String) -> RenderError {
    RenderError::Backend { id: entry.id.clone(), reason }
}

fn output_error(entry: &PlotEntry, path: &Path, reason: impl ToString) -> RenderError {
    RenderError::Output { id: entry.id.clone(), path: path.display().to_string(), reason: reason.to_string() }
}
