//! In-memory parameter storage (host simulation backend).
//!
//! Implements [`StoragePort`] over a `HashMap`.  Failure injection switches
//! let tests exercise the error paths of parameter load and save.

use std::collections::HashMap;

use log::info;

use crate::app::ports::StoragePort;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    store: HashMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("MemoryStore: simulation backend");
        Self::default()
    }

    /// Make every subsequent read fail with [`StorageError::IoError`].
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent write fail with [`StorageError::Full`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }
}

impl StoragePort for MemoryStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.fail_reads {
            return Err(StorageError::IoError);
        }
        match self.store.get(&Self::composite_key(namespace, key)) {
            Some(v) => {
                let n = v.len().min(buf.len());
                buf[..n].copy_from_slice(&v[..n]);
                Ok(n)
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Full);
        }
        self.store
            .insert(Self::composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&Self::composite_key(namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&Self::composite_key(namespace, key))
    }
}
