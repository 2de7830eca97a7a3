use std::{collections::BTreeMap, sync::RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// Durable key-value slots holding JSON text.
///
/// Each slot has exactly one logical writer. Implementations use interior mutability so a
/// single backend can be shared between the ledger store and the template registry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn clear(&self, key: &str) -> CoreResult<()>;
}

/// Volatile backend used by tests and by callers that do not want anything on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot before the store is handed to a component.
    pub fn with_slot(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(key.into(), value.into());
        }
        self
    }

    pub fn keys(&self) -> Vec<String> {
        self.slots
            .read()
            .map(|slots| slots.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> CoreResult<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        slots.remove(key);
        Ok(())
    }
}

fn poisoned() -> CoreError {
    CoreError::Storage("memory store lock poisoned".into())
}

/// Reads and decodes a slot. Missing, unreadable and corrupt slots all yield `None`.
pub fn read_slot<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(slot = key, error = %err, "slot unreadable, treating as empty");
            return None;
        }
    };
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(slot = key, error = %err, "slot corrupt, treating as empty");
            None
        }
    }
}

/// Whether the slot holds anything, decodable or not. An unreadable backend counts as present
/// so fallbacks do not shadow data that could not be read.
pub fn slot_present(storage: &dyn KeyValueStore, key: &str) -> bool {
    match storage.get(key) {
        Ok(Some(raw)) => !raw.trim().is_empty(),
        Ok(None) => false,
        Err(_) => true,
    }
}

/// Serializes `value` and writes the whole slot.
pub fn write_slot<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> CoreResult<()> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)?;
    debug!(slot = key, bytes = json.len(), "slot written");
    Ok(())
}
