use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::models::TrackingMode;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    tracking_mode: TrackingMode,
}

/// User preference store backed by a JSON file. The tracking mode may change
/// at any time from the host's settings screen, so the reconciler reads it
/// through [`SettingsStore::tracking_mode`] at the moment of restoration
/// rather than caching it.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn tracking_mode(&self) -> TrackingMode {
        self.data.read().unwrap().tracking_mode
    }

    pub fn update_tracking_mode(&self, mode: TrackingMode) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.tracking_mode = mode;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
