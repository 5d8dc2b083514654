//! Storage module: key-value slot store untuk cached blobs
//!
//! Store tidak tahu isi blob. Codec yang encode/decode, store hanya
//! menyimpan byte apa adanya di bawah satu logical key.

mod mmap_slot;

use std::collections::HashMap;
use std::io;

pub use mmap_slot::MmapSlotStore;

/// Small persistent key-value store holding one opaque blob per key.
pub trait SlotStore {
    /// `Ok(None)` when nothing was ever stored under `key`.
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replace the blob under `key`. A concurrent `load` sees either the old
    /// or the new blob, never a mix.
    fn store(&mut self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// Keys are used as file stems, so only `[A-Za-z0-9_-]` is accepted.
pub(crate) fn validate_key(key: &str) -> io::Result<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid slot key: {key:?}"),
        ))
    }
}

/// In-memory slot store
#[derive(Debug, Default, Clone)]
pub struct MemorySlotStore {
    slots: HashMap<String, Vec<u8>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStore for MemorySlotStore {
    fn load(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.slots.get(key).cloned())
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> io::Result<()> {
        validate_key(key)?;
        self.slots.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        validate_key(key)?;
        self.slots.remove(key);
        Ok(())
    }
}
