// ==========================================
// Viveverde Weekly Purchase-Order System - Buffer State Repository
// ==========================================
// Persists the per-item safety-stock target across weeks.
// Storage: state.json (key "code|size|color" -> integer units)
// ==========================================
// Contract: read at the start of a week's computation, committed once
// per section AFTER its whole order table assembles (all-or-nothing;
// a failed section never leaves partial buffer updates behind).
// Within one commit map, last writer wins.
// ==========================================

use crate::domain::types::ItemKey;
use crate::repository::error::RepositoryError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

// ==========================================
// BufferStateRepository trait
// ==========================================
// Injected into the safety-stock stage so the pipeline never touches
// ambient state.
pub trait BufferStateRepository {
    /// Last persisted safety target for the item; 0 when untracked.
    fn get(&self, key: &ItemKey) -> u32;

    /// Apply a section's fresh targets and persist them atomically.
    fn commit_section(&self, updates: &HashMap<ItemKey, u32>) -> Result<(), RepositoryError>;
}

// ==========================================
// On-disk state document
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateFile {
    version: String,
    created_at: String,
    updated_at: Option<String>,
    last_processed_week: Option<u32>,
    // canonical item key -> safety target
    stock_acumulado: HashMap<String, u32>,
}

impl StateFile {
    fn initial() -> Self {
        Self {
            version: crate::STATE_VERSION.to_string(),
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
            last_processed_week: None,
            stock_acumulado: HashMap::new(),
        }
    }
}

// ==========================================
// JsonFileBufferRepository
// ==========================================
pub struct JsonFileBufferRepository {
    path: PathBuf,
    state: Mutex<StateFile>,
}

impl JsonFileBufferRepository {
    /// Open (or create) the state file.
    ///
    /// A corrupt file falls back to its .backup copy; when that also
    /// fails a fresh state is started and the incident logged.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let state = Self::load_or_recover(&path)?;
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn load_or_recover(path: &Path) -> Result<StateFile, RepositoryError> {
        if !path.exists() {
            info!(path = %path.display(), "state file not found, starting fresh");
            return Ok(StateFile::initial());
        }

        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<StateFile>(&raw) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "state file corrupt, trying backup");
                    Self::load_backup(path)
                }
            },
            Err(e) => Err(RepositoryError::Io(e)),
        }
    }

    fn load_backup(path: &Path) -> Result<StateFile, RepositoryError> {
        let backup = backup_path(path);
        if backup.exists() {
            if let Ok(raw) = fs::read_to_string(&backup) {
                if let Ok(state) = serde_json::from_str::<StateFile>(&raw) {
                    info!(path = %backup.display(), "state recovered from backup");
                    return Ok(state);
                }
            }
        }
        warn!("no usable backup, starting fresh state");
        Ok(StateFile::initial())
    }

    /// Week bookkeeping: last week fully processed by a run.
    pub fn last_processed_week(&self) -> Option<u32> {
        self.state.lock().ok()?.last_processed_week
    }

    pub fn set_last_processed_week(&self, week: u32) -> Result<(), RepositoryError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| RepositoryError::Lock(e.to_string()))?;
        state.last_processed_week = Some(week);
        Self::persist(&self.path, &mut state)
    }

    /// Number of tracked items (for startup logging).
    pub fn tracked_items(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.stock_acumulado.len())
            .unwrap_or(0)
    }

    // Backup the previous file, then replace it with the new state.
    fn persist(path: &Path, state: &mut StateFile) -> Result<(), RepositoryError> {
        state.updated_at = Some(Utc::now().to_rfc3339());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if path.exists() {
            if let Err(e) = fs::copy(path, backup_path(path)) {
                warn!(error = %e, "could not write state backup");
            }
        }

        let raw = serde_json::to_string_pretty(&*state)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

impl BufferStateRepository for JsonFileBufferRepository {
    fn get(&self, key: &ItemKey) -> u32 {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.stock_acumulado.get(&key.canonical()).copied())
            .unwrap_or(0)
    }

    fn commit_section(&self, updates: &HashMap<ItemKey, u32>) -> Result<(), RepositoryError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| RepositoryError::Lock(e.to_string()))?;

        for (key, target) in updates {
            state.stock_acumulado.insert(key.canonical(), *target);
        }

        Self::persist(&self.path, &mut state)?;
        info!(updated = updates.len(), "buffer state committed");
        Ok(())
    }
}

// ==========================================
// InMemoryBufferRepository - test double
// ==========================================
pub struct InMemoryBufferRepository {
    map: Mutex<HashMap<ItemKey, u32>>,
}

impl InMemoryBufferRepository {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }

    /// Preload a tracked buffer target.
    pub fn seed(&self, key: ItemKey, target: u32) {
        self.map.lock().unwrap().insert(key, target);
    }

    pub fn snapshot(&self) -> HashMap<ItemKey, u32> {
        self.map.lock().unwrap().clone()
    }
}

impl Default for InMemoryBufferRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferStateRepository for InMemoryBufferRepository {
    fn get(&self, key: &ItemKey) -> u32 {
        self.map.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn commit_section(&self, updates: &HashMap<ItemKey, u32>) -> Result<(), RepositoryError> {
        let mut map = self.map.lock().unwrap();
        for (key, target) in updates {
            map.insert(key.clone(), *target);
        }
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".backup");
    PathBuf::from(os)
}
