//! Taxonomía de errores del motor.
//!
//! - `ConfigError`: fatal, no se ejecuta nada.
//! - `StoreError::Corrupt`: recuperable, se trata como store vacío.
//! - `StoreError::Persist`: fatal al final de la corrida.
//! - `DataError` / `RenderError`: por entrada, nunca abortan la corrida.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read plot config {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot parse plot config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("plot config must be an array of entries or an object with a `plots` array")]
    Shape,
    #[error("plot entry {entry}: {reason}")]
    Invalid { entry: String, reason: String },
    #[error("duplicate plot id `{0}`")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("hash store {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("cannot read hash store {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot persist hash store {path}: {source}")]
    Persist { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum DataError {
    #[error("[{id}] data source `{reference}` unavailable: {reason}")]
    Unavailable { id: String, reference: String, reason: String },
    #[error("[{id}] missing column `{column}`")]
    MissingColumn { id: String, column: String },
    #[error("[{id}] malformed data: {reason}")]
    Malformed { id: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum RenderError {
    #[error("[{id}] entry has no output paths")]
    NoOutputs { id: String },
    #[error("[{id}] missing column `{column}`")]
    MissingColumn { id: String, column: String },
    #[error("[{id}] drawing failed: {reason}")]
    Backend { id: String, reason: String },
    #[error("[{id}] cannot write {path}: {reason}")]
    Output { id: String, path: String, reason: String },
    #[error("[{id}] renderer panicked")]
    Panicked { id: String },
}

impl DataError {
    /// Identificador del plot afectado.
    pub fn plot_id(&self) -> &str {
        match self {
            Self::Unavailable { id, .. } | Self::MissingColumn { id, .. } | Self::Malformed { id, .. } => id,
        }
    }
}

impl RenderError {
    pub fn plot_id(&self) -> &str {
        match self {
            Self::NoOutputs { id }
            | Self::MissingColumn { id, .. }
            | Self::Backend { id, .. }
            | Self::Output { id, .. }
            | Self::Panicked { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_entry_errors_carry_plot_id() {
        let d = DataError::MissingColumn { id: "exp_f32".into(), column: "base_y".into() };
        assert_eq!(d.plot_id(), "exp_f32");
        assert_eq!(d.to_string(), "[exp_f32] missing column `base_y`");

        let r = RenderError::Panicked { id: "log_f64".into() };
        assert_eq!(r.plot_id(), "log_f64");
        assert!(r.to_string().contains("log_f64"));
    }

    #[test]
    fn config_error_names_entry() {
        let e = ConfigError::Invalid { entry: "#2".into(), reason: "missing `xname`".into() };
        assert_eq!(e.to_string(), "plot entry #2: missing `xname`");
    }
}
