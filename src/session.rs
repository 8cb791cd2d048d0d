use crate::error::{ChartDataError, Result};
use crate::payload::{ProcessingResult, SummaryResult};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Snapshots stored under another version are not loaded.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_name: String,
    /// Upload category, e.g. "balance-sheet" or "profit".
    pub category: String,
    #[serde(default)]
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub schema_version: u32,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFile>,
    #[serde(default)]
    pub processing_results: Vec<ProcessingResult>,
    #[serde(default)]
    pub summary_result: Option<SummaryResult>,
    #[serde(default)]
    pub processing_complete: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            uploaded_files: Vec::new(),
            processing_results: Vec::new(),
            summary_result: None,
            processing_complete: false,
            updated_at: Utc::now(),
        }
    }
}

impl SessionSnapshot {
    pub fn new(uploaded_files: Vec<UploadedFile>) -> Self {
        Self {
            uploaded_files,
            ..Default::default()
        }
    }

    pub fn complete(&mut self, processing_results: Vec<ProcessingResult>, summary: Option<SummaryResult>) {
        self.processing_results = processing_results;
        self.summary_result = summary;
        self.processing_complete = true;
        self.updated_at = Utc::now();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        check_version(&value)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn check_version(value: &serde_json::Value) -> Result<()> {
    let found = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);

    if found != u64::from(SESSION_SCHEMA_VERSION) {
        return Err(ChartDataError::UnsupportedSchemaVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            expected: SESSION_SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Snapshots keyed by session, replacing browser-global storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    sessions: BTreeMap<SessionId, SessionSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct StoreFile<T> {
    sessions: BTreeMap<SessionId, T>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, id: SessionId, mut snapshot: SessionSnapshot) {
        snapshot.schema_version = SESSION_SCHEMA_VERSION;
        snapshot.updated_at = Utc::now();
        debug!("Storing session {}", id);
        self.sessions.insert(id, snapshot);
    }

    pub fn get(&self, id: &SessionId) -> Result<&SessionSnapshot> {
        self.sessions
            .get(id)
            .ok_or_else(|| ChartDataError::SessionNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Result<&mut SessionSnapshot> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| ChartDataError::SessionNotFound(id.to_string()))
    }

    /// Forgets a session, as when the user starts over with new documents.
    pub fn clear(&mut self, id: &SessionId) -> Option<SessionSnapshot> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            info!("Cleared session {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        let file = StoreFile {
            sessions: self.sessions.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: StoreFile<serde_json::Value> = serde_json::from_str(json)?;
        let mut sessions = BTreeMap::new();

        for (id, value) in file.sessions {
            if let Err(e) = check_version(&value) {
                warn!("Dropping session {}: {}", id, e);
                continue;
            }
            sessions.insert(id, serde_json::from_value(value)?);
        }

        Ok(Self { sessions })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        debug!("Saved {} sessions to {}", self.len(), path.display());
        Ok(())
    }

    /// Loads a store, or an empty one if `path` does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let store = Self::from_json(&fs::read_to_string(path)?)?;
        info!("Loaded {} sessions from {}", store.len(), path.display());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn upload(name: &str, category: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            category: category.to_string(),
            status: UploadStatus::Completed,
            error: None,
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new();
        let a = SessionId::new("a");
        let b = SessionId::new("b");

        store.put(a.clone(), SessionSnapshot::new(vec![upload("q4.pdf", "balance-sheet")]));
        store.put(b.clone(), SessionSnapshot::default());

        assert_eq!(store.get(&a).unwrap().uploaded_files.len(), 1);
        assert!(store.get(&b).unwrap().uploaded_files.is_empty());

        store.get_mut(&b).unwrap().complete(Vec::new(), None);
        assert!(store.get(&b).unwrap().processing_complete);
        assert!(!store.get(&a).unwrap().processing_complete);

        assert!(store.clear(&a).is_some());
        assert!(matches!(store.get(&a), Err(ChartDataError::SessionNotFound(_))));
        assert!(store.clear(&a).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_snapshot_version_is_checked() {
        let snapshot = SessionSnapshot::new(vec![upload("cf.pdf", "cash-flow")]);
        let json = snapshot.to_json().unwrap();
        assert_eq!(SessionSnapshot::from_json(&json).unwrap(), snapshot);

        let stale = json.replace("\"schema_version\": 1", "\"schema_version\": 0");
        assert!(matches!(
            SessionSnapshot::from_json(&stale),
            Err(ChartDataError::UnsupportedSchemaVersion { found: 0, expected: 1 })
        ));
    }

    #[test]
    fn test_store_load_drops_stale_sessions() {
        let json = r#"{
            "sessions": {
                "current": {"schema_version": 1, "updated_at": "2024-01-01T00:00:00Z"},
                "stale": {"schema_version": 7, "updated_at": "2024-01-01T00:00:00Z"},
                "unversioned": {"updated_at": "2024-01-01T00:00:00Z"}
            }
        }"#;

        let store = SessionStore::from_json(json).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(&SessionId::new("current")).is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state").join("sessions.json");

        assert!(SessionStore::load(&path).unwrap().is_empty());

        let mut store = SessionStore::new();
        let mut snapshot = SessionSnapshot::new(vec![upload("pl.pdf", "profit")]);
        snapshot.complete(
            vec![ProcessingResult {
                success: true,
                ..Default::default()
            }],
            Some(SummaryResult {
                success: true,
                summary: "ok".to_string(),
                ..Default::default()
            }),
        );
        store.put(SessionId::new("s1"), snapshot);
        store.save(&path).unwrap();

        let loaded = SessionStore::load(&path).unwrap();
        assert_eq!(loaded, store);
    }
}
