//! Hash store en CSV legible:
//!
//! ```text
//! id,fingerprint
//! @last_modified,2024-05-01T10:00:00.123456789Z
//! exp_f32,3f1c...
//! ```
//!
//! Se reescribe completo en cada corrida vía archivo temporal + rename.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use tempfile::NamedTempFile;

use super::{HashRecord, HashStore};
use crate::constants::{LAST_MODIFIED_KEY, STORE_HEADER};
use crate::errors::StoreError;

/// Store respaldado por un archivo CSV en una ruta fija.
#[derive(Debug, Clone)]
pub struct CsvHashStore {
    path: PathBuf,
}

impl CsvHashStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HashStore for CsvHashStore {
    fn load(&self) -> Result<HashRecord, StoreError> {
        load_record(&self.path)
    }

    fn save(&mut self, record: &HashRecord) -> Result<DateTime<Utc>, StoreError> {
        save_record(&self.path, record)
    }
}

/// Lee el store. Inexistente ⇒ `HashRecord::empty()`.
pub fn load_record(path: &Path) -> Result<HashRecord, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("hash store {} not found, starting empty", path.display());
            return Ok(HashRecord::empty());
        }
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    parse_record(&text).map_err(|reason| StoreError::Corrupt { path: path.to_path_buf(), reason })
}

fn parse_record(text: &str) -> Result<HashRecord, String> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());
    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    if headers.iter().collect::<Vec<_>>() != STORE_HEADER {
        return Err(format!("unexpected header `{}`", headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut rows = reader.records();
    let first = rows.next().ok_or("missing last_modified row")?.map_err(|e| e.to_string())?;
    if first.get(0) != Some(LAST_MODIFIED_KEY) {
        return Err(format!("first row must be `{LAST_MODIFIED_KEY}`"));
    }
    let raw_ts = first.get(1).unwrap_or_default();
    let last_modified = DateTime::parse_from_rfc3339(raw_ts).map_err(|e| format!("invalid timestamp `{raw_ts}`: {e}"))?
                                                              .with_timezone(&Utc);

    let mut record = HashRecord { last_modified, ..HashRecord::empty() };
    for row in rows {
        let row = row.map_err(|e| e.to_string())?;
        let (id, fp) = match (row.get(0), row.get(1)) {
            (Some(id), Some(fp)) if !id.is_empty() && !fp.is_empty() => (id, fp),
            _ => return Err(format!("malformed row at line {}", row.position().map_or(0, |p| p.line()))),
        };
        if record.contains(id) {
            warn!("hash store: duplicate id `{id}`, keeping last value");
        }
        record.insert(id, fp);
    }
    Ok(record)
}

/// Escribe el store de forma atómica con `Utc::now()` como
/// `last_modified`. Devuelve el timestamp escrito.
pub fn save_record(path: &Path, record: &HashRecord) -> Result<DateTime<Utc>, StoreError> {
    let persist_err = |source: io::Error| StoreError::Persist { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(persist_err)?;

    let now = Utc::now();
    let stamp = now.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let tmp = NamedTempFile::new_in(&dir).map_err(persist_err)?;
    let mut writer = csv::Writer::from_writer(tmp);
    let written: Result<(), csv::Error> = (|| {
        writer.write_record(STORE_HEADER)?;
        writer.write_record([LAST_MODIFIED_KEY, stamp.as_str()])?;
        for (id, fp) in &record.fingerprints {
            writer.write_record([id.as_str(), fp.as_str()])?;
        }
        Ok(())
    })();
    written.map_err(|e| persist_err(io::Error::other(e)))?;

    let mut tmp = writer.into_inner().map_err(|e| persist_err(io::Error::other(e.to_string())))?;
    tmp.flush().map_err(persist_err)?;
    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(path).map_err(|e| persist_err(e.error))?;
    debug!("hash store {} written ({} entries)", path.display(), record.len());
    Ok(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::epoch;

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_record("").is_err());
        assert!(parse_record("not,a,store\n").is_err());
        assert!(parse_record("id,fingerprint\n").is_err());
        assert!(parse_record("id,fingerprint\nexp,abc\n").is_err());
        assert!(parse_record("id,fingerprint\n@last_modified,yesterday\n").is_err());
        assert!(parse_record("id,fingerprint\n@last_modified,2024-01-01T00:00:00Z\nexp\n").is_err());
    }

    #[test]
    fn parse_accepts_minimal_store() {
        let r = parse_record("id,fingerprint\n@last_modified,2024-01-01T00:00:00Z\nexp,abc\n").unwrap();
        assert_eq!(r.get("exp"), Some("abc"));
        assert_eq!(r.last_modified.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_ne!(r.last_modified, epoch());
    }
}
