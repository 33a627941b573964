//! Session-scoped key/value persistence.
//!
//! The browser's session storage is the real backend; the trait keeps the
//! engine testable and lets embedders bridge whatever store they have.
//! Values are JSON text; a value that fails to decode is treated as absent.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store with session-storage semantics, shared by clone.
#[derive(Default, Clone)]
pub struct MemorySessionStore {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.data.write().unwrap().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.data.write().unwrap().remove(key);
    }
}

pub fn read_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding corrupt session state under {key}: {err}");
            None
        }
    }
}

pub fn write_json<T: Serialize>(store: &dyn SessionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, &raw),
        Err(err) => warn!("failed to serialize session state for {key}: {err}"),
    }
}
