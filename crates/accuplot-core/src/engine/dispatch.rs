//! Render Dispatcher: invoca el renderer para cada entrada marcada,
//! aislando fallos (error de datos, error de render o panic) por entrada.
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{error, info, warn};
use rayon::prelude::*;

use super::collaborators::{DataSource, Renderer};
use super::decision::{ReplotPlan, ReplotReason};
use crate::errors::{DataError, RenderError};
use crate::model::PlotEntry;

/// Resultado de una entrada en la corrida.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Rendered { outputs: Vec<PathBuf> },
    Skipped(ReplotReason),
    DataFailed(DataError),
    RenderFailed(RenderError),
}

impl EntryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::DataFailed(_) | Self::RenderFailed(_))
    }
}

/// Resultados por id, en el orden de la configuración.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub outcomes: IndexMap<String, EntryOutcome>,
}

impl DispatchReport {
    pub fn get(&self, id: &str) -> Option<&EntryOutcome> {
        self.outcomes.get(id)
    }

    pub fn rendered(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::Rendered { .. }))
            .map(|(id, _)| id.as_str())
    }

    /// Ids cuyo origen de datos falló: no se persiste su fingerprint.
    pub fn data_failures(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::DataFailed(_)))
            .map(|(id, _)| id.as_str())
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_failure()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.values().filter(|o| matches!(o, EntryOutcome::Skipped(_))).count()
    }
}

pub struct RenderDispatcher<'a, D: DataSource, R: Renderer> {
    source: &'a D,
    renderer: &'a R,
    output_root: PathBuf,
    jobs: usize,
}

impl<'a, D: DataSource, R: Renderer> RenderDispatcher<'a, D, R> {
    pub fn new(source: &'a D, renderer: &'a R, output_root: impl Into<PathBuf>) -> Self {
        Self { source, renderer, output_root: output_root.into(), jobs: 1 }
    }

    /// Número de workers; `1` renderiza en el thread actual.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Ejecuta el plan. Nunca falla: cada error queda en el reporte.
    pub fn dispatch(&self, entries: &[PlotEntry], plan: &ReplotPlan) -> DispatchReport {
        let mut outcomes: IndexMap<String, EntryOutcome> = IndexMap::with_capacity(entries.len());
        let mut jobs: Vec<&PlotEntry> = Vec::new();
        for entry in entries {
            match plan.reason(&entry.id) {
                Some(reason) if reason.renders() => jobs.push(entry),
                Some(reason) => {
                    outcomes.insert(entry.id.clone(), EntryOutcome::Skipped(reason));
                }
                None => {
                    outcomes.insert(entry.id.clone(), EntryOutcome::Skipped(ReplotReason::Unchanged));
                }
            }
        }

        let rendered = self.run_jobs(&jobs);

        // Reordenar según la configuración.
        let mut by_id: IndexMap<String, EntryOutcome> = rendered.into_iter().collect();
        let mut report = DispatchReport::default();
        for entry in entries {
            let outcome = by_id.swap_remove(&entry.id)
                               .or_else(|| outcomes.swap_remove(&entry.id))
                               .unwrap_or(EntryOutcome::Skipped(ReplotReason::Unchanged));
            report.outcomes.insert(entry.id.clone(), outcome);
        }
        report
    }

    fn run_jobs(&self, jobs: &[&PlotEntry]) -> Vec<(String, EntryOutcome)> {
        if self.jobs > 1 && jobs.len() > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                Ok(pool) => {
                    return pool.install(|| jobs.par_iter().map(|e| (e.id.clone(), self.render_one(e))).collect());
                }
                Err(e) => warn!("cannot build render pool ({e}); rendering sequentially"),
            }
        }
        jobs.iter().map(|e| (e.id.clone(), self.render_one(e))).collect()
    }

    fn render_one(&self, entry: &PlotEntry) -> EntryOutcome {
        let table = match self.source.resolve(entry) {
            Ok(t) => t,
            Err(e) => {
                error!("plot {}: {e}", entry.id);
                return EntryOutcome::DataFailed(e);
            }
        };

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.renderer.render(entry, &table, &self.output_root)));
        match attempt {
            Ok(Ok(outputs)) => {
                info!("plot {}: rendered {} output(s)", entry.id, outputs.len());
                EntryOutcome::Rendered { outputs }
            }
            Ok(Err(e)) => {
                error!("plot {}: {e}", entry.id);
                EntryOutcome::RenderFailed(e)
            }
            Err(_) => {
                let e = RenderError::Panicked { id: entry.id.clone() };
                error!("plot {}: {e}", entry.id);
                EntryOutcome::RenderFailed(e)
            }
        }
    }
}
