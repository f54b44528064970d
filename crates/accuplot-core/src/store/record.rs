use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{Fingerprint, Fingerprints};

/// Registro persistido: fingerprint por id y un único `last_modified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRecord {
    pub fingerprints: BTreeMap<String, String>,
    pub last_modified: DateTime<Utc>,
}

/// Timestamp de un store nunca escrito.
pub(crate) fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from(std::time::UNIX_EPOCH)
}

impl Default for HashRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl HashRecord {
    /// Registro vacío con timestamp en epoch (todo se considera nuevo).
    pub fn empty() -> Self {
        Self { fingerprints: BTreeMap::new(), last_modified: epoch() }
    }

    pub fn from_fingerprints(current: &Fingerprints) -> Self {
        let fingerprints = current.iter().map(|(id, fp)| (id.clone(), fp.as_str().to_string())).collect();
        Self { fingerprints, last_modified: epoch() }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.fingerprints.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fingerprints.contains_key(id)
    }

    /// `true` si el fingerprint almacenado coincide con `fp`.
    pub fn matches(&self, id: &str, fp: &Fingerprint) -> bool {
        self.get(id) == Some(fp.as_str())
    }

    pub fn insert(&mut self, id: impl Into<String>, fingerprint: impl Into<String>) {
        self.fingerprints.insert(id.into(), fingerprint.into());
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.fingerprints.remove(id)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}
