//! Corpus compiler: text CIDR literals to the binary record format.
//!
//! The compiler streams, it never builds an index: corpora can run to
//! millions of lines and the reader deduplicates on load anyway.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::addr::Cidr;
use crate::store::Record;
use crate::Result;

/// Counters for one compile pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompileStats {
    /// Records written to the output
    pub emitted: u64,
    /// Input tokens dropped: parse failures, zero networks, offsets
    /// outside `[1, 31]`
    pub skipped: u64,
}

/// Stream whitespace-separated CIDR literals from `input` and write one
/// record per usable literal to `output`.
///
/// Unparseable tokens are skipped, not fatal. Duplicate literals produce
/// duplicate records.
pub fn compile<R: Read, W: Write>(input: R, output: W) -> Result<CompileStats> {
    let reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let mut stats = CompileStats::default();

    for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            let cidr = match token.parse::<Cidr>() {
                Ok(cidr) => cidr,
                Err(e) => {
                    log::debug!("skipping {:?}: {}", token, e);
                    stats.skipped += 1;
                    continue;
                }
            };

            let offset = cidr.offset();
            if u32::from(cidr.network()) == 0 || !(1..=31).contains(&offset) {
                log::debug!("skipping {}: not representable on disk", cidr);
                stats.skipped += 1;
                continue;
            }

            let record = Record {
                offset: u64::from(offset),
                key: cidr.shifted_key(),
            };
            writer.write_all(&record.encode())?;
            stats.emitted += 1;
        }
    }

    writer.flush()?;
    Ok(stats)
}

/// Compile a corpus file to a database file. File-open errors are fatal.
pub fn compile_file(input: &Path, output: &Path) -> Result<CompileStats> {
    log::debug!("opening: {}", input.display());
    let infile = File::open(input)?;
    let outfile = File::create(output)?;
    compile(infile, outfile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, RECORD_SIZE};

    fn compile_str(corpus: &str) -> (Vec<u8>, CompileStats) {
        let mut out = Vec::new();
        let stats = compile(corpus.as_bytes(), &mut out).unwrap();
        (out, stats)
    }

    #[test]
    fn test_compile_emits_one_record_per_literal() {
        let (out, stats) = compile_str("85.143.160.0/21\n10.0.0.0/8\n");
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(out.len(), 2 * RECORD_SIZE);
    }

    #[test]
    fn test_compile_accepts_any_whitespace_separation() {
        let (out, stats) = compile_str("10.0.0.0/8 10.1.0.0/16\t172.16.0.0/12\n");
        assert_eq!(stats.emitted, 3);
        assert_eq!(out.len(), 3 * RECORD_SIZE);
    }

    #[test]
    fn test_compile_skips_garbage_lines() {
        let (out, stats) = compile_str("not-a-cidr\n10.0.0.0/8\n10.0.0.0\n10.0.0.0/0\n");
        assert_eq!(stats.emitted, 1);
        assert_eq!(stats.skipped, 3);
        assert_eq!(out.len(), RECORD_SIZE);
    }

    #[test]
    fn test_compile_skips_zero_network_and_slash_32() {
        let (_, stats) = compile_str("0.0.0.0/8\n1.2.3.4/32\n");
        assert_eq!(stats.emitted, 0);
        assert_eq!(stats.skipped, 2);
    }

    #[test]
    fn test_compile_does_not_deduplicate() {
        let (out, stats) = compile_str("10.0.0.0/8\n10.0.0.0/8\n");
        assert_eq!(stats.emitted, 2);
        assert_eq!(out.len(), 2 * RECORD_SIZE);
    }

    #[test]
    fn test_compiled_output_loads_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        let db = dir.path().join("cidr.db");
        std::fs::write(&corpus, "85.143.160.0/21\n10.0.0.0/8\n10.0.0.0/8\nbogus\n").unwrap();

        let stats = compile_file(&corpus, &db).unwrap();
        assert_eq!(stats.emitted, 3);
        assert_eq!(stats.skipped, 1);

        let index = Store::new(&db).read().unwrap();
        assert_eq!(index.len(), 2); // reader deduplicates
        assert!(index.has("85.143.160.0/21".parse().unwrap()));
        assert!(index.has("10.0.0.0/8".parse().unwrap()));
    }
}
