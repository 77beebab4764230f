use crate::{
    error::{CacheError, StoreError},
    telemetry::Telemetry,
};

use super::model::{CacheEntry, RepoSummary};

const CACHE_SCHEMA_VERSION: &str = "v1";

/// Bumping the schema suffix orphans entries written in an older format.
pub fn cache_key(github_user: &str) -> String {
    format!("gh_projects_{github_user}_cache_{CACHE_SCHEMA_VERSION}")
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Best-effort persistence of the last successful fetch. Read and write
/// failures are reported to telemetry and otherwise behave like a miss or a
/// skipped write.
pub struct RepoCache<K> {
    store: K,
    key: String,
    telemetry: Telemetry,
}

impl<K: KeyValueStore> RepoCache<K> {
    pub fn new(store: K, github_user: &str, telemetry: Telemetry) -> Self {
        Self {
            store,
            key: cache_key(github_user),
            telemetry,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Option<CacheEntry> {
        match self.try_load() {
            Ok(entry) => entry,
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    pub fn save(&self, repos: &[RepoSummary], timestamp: i64) {
        if let Err(err) = self.try_save(repos, timestamp) {
            self.report(&err);
        }
    }

    fn try_load(&self) -> Result<Option<CacheEntry>, CacheError> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(|err| CacheError::Read(err.to_string()))?;

        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| CacheError::Read(err.to_string()))
    }

    fn try_save(&self, repos: &[RepoSummary], timestamp: i64) -> Result<(), CacheError> {
        let entry = CacheEntry {
            repos: repos.to_vec(),
            timestamp: Some(timestamp),
        };
        let encoded =
            serde_json::to_string(&entry).map_err(|err| CacheError::Write(err.to_string()))?;

        self.store
            .set(&self.key, &encoded)
            .map_err(|err| CacheError::Write(err.to_string()))
    }

    fn report(&self, err: &CacheError) {
        self.telemetry.warn(
            err.event(),
            serde_json::json!({ "key": self.key.as_str(), "error": err.to_string() }),
        );
    }
}
