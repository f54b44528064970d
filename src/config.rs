//! Configuración de la aplicación.
//! Se carga desde variables de entorno (`.env` incluido, leído una sola vez)
//! y la CLI puede sobreescribir cualquier valor.
use std::env;
use std::path::PathBuf;

use accuplot_core::{newest_mtime, SessionOptions};
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const ENV_PLOT_CONFIG: &str = "ACCUPLOT_PLOT_CONFIG";
pub const ENV_RESULTS_DIR: &str = "ACCUPLOT_RESULTS_DIR";
pub const ENV_PLOTS_DIR: &str = "ACCUPLOT_PLOTS_DIR";
pub const ENV_HASH_STORE: &str = "ACCUPLOT_HASH_STORE";
pub const ENV_RENDERER_SOURCES: &str = "ACCUPLOT_RENDERER_SOURCES";
pub const ENV_JOBS: &str = "ACCUPLOT_JOBS";
pub const ENV_DATA_FINGERPRINT: &str = "ACCUPLOT_DATA_FINGERPRINT";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Documento JSON con las entradas de plot.
    pub plot_config: PathBuf,
    /// Raíz de los CSV referenciados por `data`.
    pub results_dir: PathBuf,
    /// Raíz de las rutas `outputs`.
    pub plots_dir: PathBuf,
    pub hash_store: PathBuf,
    /// Archivos cuyo mtime más reciente cuenta como "modificación del
    /// renderer".
    pub renderer_sources: Vec<PathBuf>,
    pub jobs: usize,
    pub data_fingerprint: bool,
    pub force: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { plot_config: PathBuf::from("configs/unary-plots.json"),
               results_dir: PathBuf::from("accuracy_results/results"),
               plots_dir: PathBuf::from("accuracy_results/plots"),
               hash_store: PathBuf::from("accuracy_results/plot-hashes.csv"),
               renderer_sources: env::current_exe().ok().into_iter().collect(),
               jobs: 1,
               data_fingerprint: false,
               force: false }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de
    /// variables (permite testear sin tocar el entorno del proceso).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_PLOT_CONFIG) {
            cfg.plot_config = v.into();
        }
        if let Some(v) = get(ENV_RESULTS_DIR) {
            cfg.results_dir = v.into();
        }
        if let Some(v) = get(ENV_PLOTS_DIR) {
            cfg.plots_dir = v.into();
        }
        if let Some(v) = get(ENV_HASH_STORE) {
            cfg.hash_store = v.into();
        }
        if let Some(v) = get(ENV_RENDERER_SOURCES) {
            cfg.renderer_sources = env::split_paths(&v).filter(|p| !p.as_os_str().is_empty()).collect();
        }
        if let Some(v) = get(ENV_JOBS) {
            let jobs: usize = v.parse()
                               .map_err(|_| AppError::Config(format!("{ENV_JOBS} debe ser un entero positivo, recibido `{v}`")))?;
            cfg.jobs = jobs.max(1);
        }
        if let Some(v) = get(ENV_DATA_FINGERPRINT) {
            cfg.data_fingerprint = parse_flag(&v).ok_or_else(|| {
                                                     AppError::Config(format!("{ENV_DATA_FINGERPRINT} no es un booleano: `{v}`"))
                                                 })?;
        }
        Ok(cfg)
    }

    /// Opciones del motor derivadas de la configuración. El mtime del
    /// renderer se toma aquí, una vez por corrida.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions { force: self.force,
                         renderer_mtime: newest_mtime(&self.renderer_sources),
                         data_fingerprint: self.data_fingerprint,
                         jobs: self.jobs.max(1),
                         output_root: self.plots_dir.clone() }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.plot_config, PathBuf::from("configs/unary-plots.json"));
        assert_eq!(cfg.hash_store, PathBuf::from("accuracy_results/plot-hashes.csv"));
        assert_eq!(cfg.jobs, 1);
        assert!(!cfg.data_fingerprint);
        assert!(!cfg.force);
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[(ENV_PLOTS_DIR, "out"),
                                                  (ENV_JOBS, "8"),
                                                  (ENV_DATA_FINGERPRINT, "TRUE"),
                                                  (ENV_RENDERER_SOURCES, "")]))
                  .unwrap();
        assert_eq!(cfg.plots_dir, PathBuf::from("out"));
        assert_eq!(cfg.jobs, 8);
        assert!(cfg.data_fingerprint);
        // vacío ⇒ se mantiene el default
        assert_eq!(cfg.renderer_sources, AppConfig::default().renderer_sources);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        assert!(matches!(AppConfig::from_lookup(lookup(&[(ENV_JOBS, "many")])), Err(AppError::Config(_))));
        assert!(matches!(AppConfig::from_lookup(lookup(&[(ENV_DATA_FINGERPRINT, "maybe")])), Err(AppError::Config(_))));
    }

    #[test]
    fn zero_jobs_means_sequential() {
        let cfg = AppConfig::from_lookup(lookup(&[(ENV_JOBS, "0")])).unwrap();
        assert_eq!(cfg.session_options().jobs, 1);
    }
}
