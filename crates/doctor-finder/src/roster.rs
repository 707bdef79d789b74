use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::model::{DoctorEntry, DoctorRecord};

/// Read and parse the roster file at `path`.
pub fn load_roster(path: &Path) -> Result<Vec<DoctorRecord>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::Roster {
        source_name: path.display().to_string(),
        message: format!("failed to read: {e}"),
    })?;
    parse_roster(&content, &path.display().to_string())
}

/// Parse a JSON array of roster entries into records.
///
/// Symptom and timing fields are split here, once, so ranking never re-parses
/// them. Entries with a blank name are skipped rather than rejected.
pub fn parse_roster(content: &str, source_name: &str) -> Result<Vec<DoctorRecord>, AppError> {
    let entries: Vec<DoctorEntry> =
        serde_json::from_str(content).map_err(|e| AppError::Roster {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    let mut doctors = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.name.trim().is_empty() {
            warn!(source_name, "skipping roster entry without a name");
            continue;
        }
        let record = DoctorRecord::from_entry(entry);
        if record.symptoms.is_empty() {
            debug!(doctor = %record.name, "doctor has no symptoms and can never match");
        }
        doctors.push(record);
    }
    Ok(doctors)
}

/// The live roster. Readers take an immutable snapshot per call; a reload
/// swaps the whole snapshot, so calls already running are unaffected.
pub struct RosterHandle {
    current: RwLock<Arc<[DoctorRecord]>>,
}

impl RosterHandle {
    pub fn new(doctors: Vec<DoctorRecord>) -> Self {
        Self {
            current: RwLock::new(doctors.into()),
        }
    }

    pub async fn snapshot(&self) -> Arc<[DoctorRecord]> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the roster, returning the new doctor count.
    pub async fn replace(&self, doctors: Vec<DoctorRecord>) -> usize {
        let count = doctors.len();
        *self.current.write().await = doctors.into();
        info!(doctors = count, "roster replaced");
        count
    }

    /// Re-read `path`. On failure the current roster stays in place.
    pub async fn reload(&self, path: &Path) -> Result<usize, AppError> {
        let doctors = load_roster(path)?;
        Ok(self.replace(doctors).await)
    }
}
