use chrono::{DateTime, Utc};

use super::{HashRecord, HashStore};
use crate::errors::StoreError;

/// Store en memoria para tests y corridas en seco.
#[derive(Debug, Default)]
pub struct InMemoryHashStore {
    record: Option<HashRecord>,
    pub saves: usize,
}

impl InMemoryHashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: HashRecord) -> Self {
        Self { record: Some(record), saves: 0 }
    }

    pub fn record(&self) -> Option<&HashRecord> {
        self.record.as_ref()
    }
}

impl HashStore for InMemoryHashStore {
    fn load(&self) -> Result<HashRecord, StoreError> {
        Ok(self.record.clone().unwrap_or_else(HashRecord::empty))
    }

    fn save(&mut self, record: &HashRecord) -> Result<DateTime<Utc>, StoreError> {
        let now = Utc::now();
        let mut written = record.clone();
        written.last_modified = now;
        self.record = Some(written);
        self.saves += 1;
        Ok(now)
    }
}
