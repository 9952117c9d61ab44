//! Implements the `Storage` trait with an in-memory map.
//!
//! Note: this is compiled even in the "production" version of this app so
//! that the whole app can be run, top-to-bottom, without touching the
//! filesystem. Tests use it as the storage double.

use crate::store::Storage;
use crate::Result;
use anyhow::bail;
use std::collections::BTreeMap;

/// An implementation of the `Storage` trait backed by a `BTreeMap`. A store
/// can be made read-only to exercise the write-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    data: BTreeMap<String, String>,
    read_only: bool,
}

impl MemStore {
    /// Create a new, empty `MemStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `MemStore` whose writes all fail.
    pub fn read_only() -> Self {
        Self {
            data: BTreeMap::new(),
            read_only: true,
        }
    }

    /// Seed a key directly, bypassing the read-only flag.
    pub fn seed(&mut self, key: &str, value: &str) {
        self.data.insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            bail!("The store is read-only; cannot write key '{key}'");
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.read_only {
            bail!("The store is read-only; cannot remove key '{key}'");
        }
        self.data.remove(key);
        Ok(())
    }
}
