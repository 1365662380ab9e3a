//! Streaming reader: binary file to in-memory index.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use super::format::{Record, RECORD_SIZE};
use crate::index::PrefixIndex;
use crate::Result;

/// Read the whole database file into a fresh index.
pub(super) fn read_index(path: &Path) -> Result<PrefixIndex> {
    let file = File::open(path)?;
    read_records(BufReader::new(file))
}

/// Stream records until EOF, skipping the ones the format rejects:
/// zero keys (sentinel/corruption guard), offsets outside `[1, 31]`,
/// and keys too wide for their bucket. A trailing partial record is
/// ignored; any other I/O error is fatal.
pub(super) fn read_records<R: Read>(mut reader: R) -> Result<PrefixIndex> {
    let mut index = PrefixIndex::new();
    let mut buf = [0u8; RECORD_SIZE];
    let mut pos: u64 = 0;

    loop {
        let n = fill_record(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        if n < RECORD_SIZE {
            log::warn!("ignoring {} trailing bytes at offset {}", n, pos);
            break;
        }
        pos += n as u64;

        let record = Record::decode(&buf)?;

        if record.key == 0 {
            continue;
        }
        if !(1..=31).contains(&record.offset) {
            continue;
        }
        let offset = record.offset as u8;
        if record.key >> (32 - u32::from(offset)) != 0 {
            log::warn!("skipping oversized key {}/{}", record.key, offset);
            continue;
        }

        log::debug!("read: {}/{} [{:032b}]", record.key, offset, record.key);
        index.insert_entry(offset, record.key);
    }

    Ok(index)
}

/// Fill `buf` from the reader, returning how many bytes were read.
/// Anything short of a full buffer means EOF was reached.
fn fill_record<R: Read>(reader: &mut R, buf: &mut [u8; RECORD_SIZE]) -> Result<usize> {
    let mut n = 0;
    while n < RECORD_SIZE {
        match reader.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(m) => n += m,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(n)
}
