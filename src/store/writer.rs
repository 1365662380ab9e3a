//! Commit path: in-memory index to binary file.

use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::format::Record;
use crate::index::PrefixIndex;
use crate::{Error, Result};

/// Write every record to a sibling temp file, fsync, then atomically
/// rename over `path`. A crashed commit leaves either the previous or
/// the new file, never a torn one.
pub(super) fn write_index(index: &PrefixIndex, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        for (offset, key) in index.entries() {
            log::debug!("commit: {}/{} [{:032b}]", key, offset, key);
            let record = Record {
                offset: u64::from(offset),
                key,
            };
            writer.write_all(&record.encode())?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::StoreIo(e.error))?;
    Ok(())
}
