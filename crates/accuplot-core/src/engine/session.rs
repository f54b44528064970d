//! Una corrida completa: store → fingerprints → plan → render → store.
//!
//! El store se escribe una única vez, tras todos los intentos de render,
//! con los fingerprints de configuración (no de éxito): un render fallido
//! igualmente actualiza su fingerprint. Sólo las entradas cuyo origen de
//! datos falló se omiten, para reintentarlas en la próxima corrida.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{error, info};

use super::collaborators::{DataSource, Renderer};
use super::decision::{decide, ReplotPlan};
use super::dispatch::{DispatchReport, EntryOutcome, RenderDispatcher};
use crate::errors::{DataError, StoreError};
use crate::model::{fingerprint_with_data, Fingerprints, PlotEntry};
use crate::store::{HashRecord, HashStore};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Fuerza el render de todas las entradas.
    pub force: bool,
    /// Modificación más reciente del renderer (ver `newest_mtime`).
    pub renderer_mtime: Option<DateTime<Utc>>,
    /// Incluye el digest de los datos en el fingerprint.
    pub data_fingerprint: bool,
    pub jobs: usize,
    pub output_root: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { force: false,
               renderer_mtime: None,
               data_fingerprint: false,
               jobs: 1,
               output_root: PathBuf::from(".") }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub plan: ReplotPlan,
    pub report: DispatchReport,
    pub persisted: HashRecord,
    pub saved_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn rendered_count(&self) -> usize {
        self.report.rendered().count()
    }
}

/// Fingerprints actuales más los errores de digest (sólo con
/// `data_fingerprint`).
#[derive(Debug, Clone, Default)]
pub struct CurrentState {
    pub fingerprints: Fingerprints,
    pub digest_failures: IndexMap<String, DataError>,
}

pub struct ReplotSession<'a, D: DataSource, R: Renderer> {
    source: &'a D,
    renderer: &'a R,
    options: SessionOptions,
}

impl<'a, D: DataSource, R: Renderer> ReplotSession<'a, D, R> {
    pub fn new(source: &'a D, renderer: &'a R, options: SessionOptions) -> Self {
        Self { source, renderer, options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Calcula los fingerprints actuales.
    pub fn current_state(&self, entries: &[PlotEntry]) -> CurrentState {
        let mut state = CurrentState::default();
        for entry in entries {
            let digest = if self.options.data_fingerprint {
                match self.source.digest(entry) {
                    Ok(d) => d,
                    Err(e) => {
                        error!("plot {}: {e}", entry.id);
                        state.digest_failures.insert(entry.id.clone(), e);
                        continue;
                    }
                }
            } else {
                None
            };
            state.fingerprints.insert(entry.id.clone(), fingerprint_with_data(entry, digest.as_deref()));
        }
        state
    }

    /// Plan de la corrida sin renderizar ni escribir nada.
    pub fn plan(&self, entries: &[PlotEntry], stored: &HashRecord) -> (CurrentState, ReplotPlan) {
        let state = self.current_state(entries);
        let eligible: Vec<PlotEntry> = entries.iter()
                                              .filter(|e| !state.digest_failures.contains_key(&e.id))
                                              .cloned()
                                              .collect();
        let plan = decide(&eligible, &state.fingerprints, stored, self.options.renderer_mtime, self.options.force);
        (state, plan)
    }

    /// Ejecuta la corrida completa. Sólo falla si el store no puede
    /// escribirse.
    pub fn run<S: HashStore>(&self, entries: &[PlotEntry], store: &mut S) -> Result<RunSummary, StoreError> {
        let stored = store.load_or_empty();
        let (state, plan) = self.plan(entries, &stored);
        if plan.forced {
            info!("renderer changed or force requested: replotting all {} entries", plan.render.len());
        }
        info!("{} to render, {} up to date", plan.render.len(), plan.skip.len());

        let dispatcher = RenderDispatcher::new(self.source, self.renderer, self.options.output_root.clone())
            .with_jobs(self.options.jobs);
        let eligible: Vec<PlotEntry> = entries.iter()
                                              .filter(|e| !state.digest_failures.contains_key(&e.id))
                                              .cloned()
                                              .collect();
        let dispatched = dispatcher.dispatch(&eligible, &plan);

        let mut report = DispatchReport::default();
        for entry in entries {
            let outcome = match state.digest_failures.get(&entry.id) {
                Some(e) => Some(EntryOutcome::DataFailed(e.clone())),
                None => dispatched.get(&entry.id).cloned(),
            };
            if let Some(outcome) = outcome {
                report.outcomes.insert(entry.id.clone(), outcome);
            }
        }

        let mut persisted = persisted_record(&state.fingerprints, &report);
        let saved_at = store.save(&persisted)?;
        persisted.last_modified = saved_at;
        Ok(RunSummary { plan, report, persisted, saved_at })
    }
}

/// Registro a persistir: todos los fingerprints actuales excepto los de
/// entradas cuyo origen de datos falló.
pub fn persisted_record(current: &Fingerprints, report: &DispatchReport) -> HashRecord {
    let mut record = HashRecord::from_fingerprints(current);
    for id in report.data_failures() {
        record.remove(id);
    }
    record
}
