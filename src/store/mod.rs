//! Binary persistence for the prefix index.
//!
//! A database file is a bare concatenation of fixed-size records with no
//! header, no length prefix, no checksum and no terminator:
//!
//! ```text
//! +----------------+--------+
//! | offset (u64 LE)| key LE |   repeated until EOF
//! +----------------+--------+
//! ```
//!
//! The reader drops records with a zero key (sentinel) or an offset
//! outside `[1, 31]`, so `0.0.0.0/p` networks and `/32` prefixes do not
//! survive a commit/reload cycle. Commits replace the file atomically
//! via a sibling temp file.

mod format;
mod reader;
mod writer;

pub use format::{Record, KEY_SIZE, OFFSET_SIZE, RECORD_SIZE};

use std::path::{Path, PathBuf};

use crate::index::PrefixIndex;
use crate::Result;

/// Owns the on-disk representation of a prefix database.
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Bind a store to a database path. No I/O happens until `read` or
    /// `commit`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the whole file into a fresh index.
    pub fn read(&self) -> Result<PrefixIndex> {
        reader::read_index(&self.path)
    }

    /// Persist the index, atomically replacing the file.
    pub fn commit(&self, index: &PrefixIndex) -> Result<()> {
        writer::write_index(index, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::Cidr;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn test_commit_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("cidr.db"));

        let mut index = PrefixIndex::new();
        index.put(cidr("85.143.160.0/21"));
        index.put(cidr("10.0.0.0/8"));
        index.put(cidr("10.1.0.0/16"));
        store.commit(&index).unwrap();

        let reloaded = store.read().unwrap();
        assert_eq!(reloaded.len(), 3);
        assert!(reloaded.has(cidr("85.143.160.0/21")));
        assert!(reloaded.has(cidr("10.0.0.0/8")));
        assert!(reloaded.has(cidr("10.1.0.0/16")));
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("absent.db"));
        assert!(matches!(store.read(), Err(crate::Error::StoreIo(_))));
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cidr.db");
        std::fs::write(&path, b"").unwrap();

        let index = Store::new(&path).read().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_zero_network_does_not_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("cidr.db"));

        let mut index = PrefixIndex::new();
        index.put(cidr("0.0.0.0/8"));
        index.put(cidr("10.0.0.0/8"));
        store.commit(&index).unwrap();

        let reloaded = store.read().unwrap();
        assert!(!reloaded.has(cidr("0.0.0.0/8")));
        assert!(reloaded.has(cidr("10.0.0.0/8")));
    }

    #[test]
    fn test_slash_32_does_not_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("cidr.db"));

        let mut index = PrefixIndex::new();
        index.put(cidr("1.2.3.4/32"));
        index.put(cidr("10.0.0.0/8"));
        store.commit(&index).unwrap();

        let reloaded = store.read().unwrap();
        assert!(!reloaded.has(cidr("1.2.3.4/32")));
        assert!(reloaded.has(cidr("10.0.0.0/8")));
    }
}
