//! Orquestación de una corrida sobre los colaboradores reales: CSVs de
//! resultados como origen de datos y `plotters` como renderer.
use accuplot_core::{load_entries, CsvHashStore, CurrentState, Fingerprints, HashStore, PlotEntry, ReplotPlan,
                    ReplotSession, RunSummary};
use accuplot_data::CsvDataSource;
use accuplot_render::PlottersRenderer;
use log::info;

use crate::config::AppConfig;
use crate::errors::AppError;

pub struct App {
    config: AppConfig,
    source: CsvDataSource,
    renderer: PlottersRenderer,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let source = CsvDataSource::new(config.results_dir.clone());
        Self { config, source, renderer: PlottersRenderer::default() }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> CsvHashStore {
        CsvHashStore::new(self.config.hash_store.clone())
    }

    pub fn load_entries(&self) -> Result<Vec<PlotEntry>, AppError> {
        let entries = load_entries(&self.config.plot_config)?;
        info!("loaded {} plot entries from {}", entries.len(), self.config.plot_config.display());
        Ok(entries)
    }

    fn session(&self) -> ReplotSession<'_, CsvDataSource, PlottersRenderer> {
        ReplotSession::new(&self.source, &self.renderer, self.config.session_options())
    }

    /// Corrida completa: decide, renderiza y persiste el nuevo registro.
    pub fn render(&self) -> Result<RunSummary, AppError> {
        let entries = self.load_entries()?;
        let mut store = self.store();
        Ok(self.session().run(&entries, &mut store)?)
    }

    /// Decisiones de la corrida sin renderizar ni escribir el store.
    pub fn plan(&self) -> Result<(CurrentState, ReplotPlan), AppError> {
        let entries = self.load_entries()?;
        let stored = self.store().load_or_empty();
        Ok(self.session().plan(&entries, &stored))
    }

    /// Fingerprints actuales de todas las entradas.
    pub fn hashes(&self) -> Result<Fingerprints, AppError> {
        let entries = self.load_entries()?;
        Ok(self.session().current_state(&entries).fingerprints)
    }
}
