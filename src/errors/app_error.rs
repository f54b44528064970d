use accuplot_core::{ConfigError, StoreError};
use thiserror::Error;

/// Errores fatales de una corrida: cualquier otro fallo se reporta por
/// entrada sin abortar.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Configuración de plots inválida: {0}")]
    Plots(#[from] ConfigError),
    #[error("Hash store: {0}")]
    Store(#[from] StoreError),
}
