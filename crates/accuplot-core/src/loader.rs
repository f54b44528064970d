//! Config Loader: documento JSON declarativo → `Vec<PlotEntry>` validado.
//!
//! Acepta un array de entradas o un objeto `{ "plots": [...] }`. Cualquier
//! entrada inválida aborta la carga completa (`ConfigError` es fatal).
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

use crate::constants::LAST_MODIFIED_KEY;
use crate::errors::ConfigError;
use crate::model::PlotEntry;

/// Lee y valida la configuración desde disco.
pub fn load_entries(path: &Path) -> Result<Vec<PlotEntry>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let entries = parse_entries(&text)?;
    debug!("loaded {} plot entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parsea y valida un documento de configuración en memoria.
pub fn parse_entries(text: &str) -> Result<Vec<PlotEntry>, ConfigError> {
    let doc: Value = serde_json::from_str(text)?;
    let raw = match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("plots") {
            Some(Value::Array(items)) => items,
            _ => return Err(ConfigError::Shape),
        },
        _ => return Err(ConfigError::Shape),
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());
    for (index, item) in raw.into_iter().enumerate() {
        let entry = parse_entry(index, item)?;
        if !seen.insert(entry.id.clone()) {
            return Err(ConfigError::DuplicateId(entry.id));
        }
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_entry(index: usize, item: Value) -> Result<PlotEntry, ConfigError> {
    let label = item.get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{index}"));
    let invalid = |reason: String| ConfigError::Invalid { entry: label.clone(), reason };

    if !item.is_object() {
        return Err(invalid("entry must be an object".into()));
    }
    for required in ["id", "data", "xname", "ynames"] {
        if item.get(required).map_or(true, Value::is_null) {
            return Err(invalid(format!("missing required field `{required}`")));
        }
    }

    let entry: PlotEntry = serde_json::from_value(item).map_err(|e| invalid(e.to_string()))?;

    if entry.id.trim().is_empty() {
        return Err(invalid("`id` must not be empty".into()));
    }
    if entry.id.starts_with('@') || entry.id == LAST_MODIFIED_KEY {
        return Err(invalid("`id` must not start with `@`".into()));
    }
    if entry.data.trim().is_empty() {
        return Err(invalid("`data` must not be empty".into()));
    }
    if entry.xname.trim().is_empty() {
        return Err(invalid("`xname` must not be empty".into()));
    }
    if entry.ynames.is_empty() {
        return Err(invalid("`ynames` must list at least one series".into()));
    }
    if let Some(field) = entry.ynames.iter().find(|s| s.field.trim().is_empty()) {
        return Err(invalid(format!("series with empty field (suffix `{}`)", field.suffix)));
    }
    let mut outputs = HashSet::new();
    if let Some(dup) = entry.outputs.iter().find(|o| !outputs.insert(o.as_path())) {
        return Err(invalid(format!("output `{}` listed more than once", dup.display())));
    }
    for (name, lim) in [("xlim", entry.params.xlim), ("ylim", entry.params.ylim)] {
        if let (Some(lo), Some(hi)) = (lim.min, lim.max) {
            if lo > hi {
                return Err(invalid(format!("`{name}` min {lo} is greater than max {hi}")));
            }
        }
    }

    for key in entry.unknown_keys() {
        warn!("plot {}: unknown entry key `{key}` (kept in fingerprint)", entry.id);
    }
    for key in entry.params.unknown_keys() {
        warn!("plot {}: unknown plot_params key `{key}` (kept in fingerprint)", entry.id);
    }
    if !entry.is_renderable() {
        warn!("plot {}: no outputs declared, it will never be rendered", entry.id);
    }
    Ok(entry)
}
