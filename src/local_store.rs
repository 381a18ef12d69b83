use std::{collections::HashMap, fs, path::PathBuf, sync::RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::AyahRef;

const ENABLE_LOGS: bool = true;
use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct DeviceRecord {
    lock_enabled: bool,
    last_positions: HashMap<u16, u16>,
}

/// Device-local key-value fallback, last-write-wins. Holds the undebounced
/// last-visible ayah per surah (the offline-safe copy written on every
/// scroll) and the auto-scroll lock flag, which never goes to the backing
/// store. The lock flag is also exposed as a watch channel so the playback
/// follower reacts to toggles without polling.
pub struct LocalStore {
    path: PathBuf,
    data: RwLock<DeviceRecord>,
    lock_tx: watch::Sender<bool>,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read device store from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            DeviceRecord::default()
        };

        let (lock_tx, _) = watch::channel(data.lock_enabled);

        Ok(Self {
            path,
            data: RwLock::new(data),
            lock_tx,
        })
    }

    pub fn last_position(&self, surah: u16) -> Option<AyahRef> {
        let guard = self.data.read().unwrap();
        guard
            .last_positions
            .get(&surah)
            .map(|&ayah| AyahRef::new(surah, ayah))
    }

    pub fn set_last_position(&self, target: AyahRef) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.last_positions.insert(target.surah, target.ayah);
        self.persist(&guard)
    }

    pub fn remove_last_position(&self, surah: u16) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.last_positions.remove(&surah);
        self.persist(&guard)
    }

    pub fn lock_enabled(&self) -> bool {
        *self.lock_tx.borrow()
    }

    pub fn subscribe_lock(&self) -> watch::Receiver<bool> {
        self.lock_tx.subscribe()
    }

    pub fn set_lock(&self, enabled: bool) {
        {
            let mut guard = self.data.write().unwrap();
            guard.lock_enabled = enabled;
            if let Err(err) = self.persist(&guard) {
                log_warn!("failed to persist lock flag: {err:?}");
            }
        }
        let _ = self.lock_tx.send(enabled);
    }

    fn persist(&self, data: &DeviceRecord) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write device store to {}", self.path.display()))
    }
}
