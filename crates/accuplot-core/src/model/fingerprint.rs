use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::PlotEntry;
use crate::constants::RENDERER_VERSION;
use crate::hashing::{hash_value, strip_volatile};

/// Digest hex (blake3, 64 caracteres) de la configuración de una entrada.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reconstruye un fingerprint leído de un store.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprints actuales por id de plot.
pub type Fingerprints = BTreeMap<String, Fingerprint>;

/// Insumos del fingerprint. NO es el fingerprint final sino el modelo previo
/// a canonicalizar.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    renderer_version: &'a str,
    entry: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_digest: Option<&'a str>,
}

/// Fingerprint puro de la configuración de una entrada.
pub fn fingerprint(entry: &PlotEntry) -> Fingerprint {
    fingerprint_with_data(entry, None)
}

/// Igual que `fingerprint`, incorporando opcionalmente el digest de los
/// datos resueltos.
pub fn fingerprint_with_data(entry: &PlotEntry, data_digest: Option<&str>) -> Fingerprint {
    let input = FingerprintInput { renderer_version: RENDERER_VERSION,
                                   entry: strip_volatile(&entry.to_value()),
                                   data_digest };
    // Sólo contiene `Value` y `&str`: la serialización no falla.
    let value = serde_json::to_value(&input).unwrap_or_default();
    Fingerprint(hash_value(&value))
}

/// Fingerprints de toda la configuración.
pub fn fingerprint_all(entries: &[PlotEntry]) -> Fingerprints {
    entries.iter().map(|e| (e.id.clone(), fingerprint(e))).collect()
}
