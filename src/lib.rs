//! cidrdb - a compiled IPv4 CIDR prefix database.
//!
//! Answers the question: given an IPv4 address, which CIDR prefixes in
//! a known set cover it? The prefix set is built from a text corpus,
//! persisted as a flat binary file, queried and mutated in memory, and
//! exposed over a small REST service.
//!
//! # Data layout
//!
//! A prefix `network/p` is stored as `(offset, key)` where
//! `offset = 32 - p` and `key = network >> offset`: the network portion
//! right-aligned with the trailing host bits compressed away. The index
//! keeps one ordered key set per offset, so a lookup is at most 32 set
//! probes and the whole structure round-trips through a headerless
//! stream of fixed-size records.
//!
//! # Quick start
//!
//! ```no_run
//! use cidrdb::Store;
//!
//! # fn main() -> cidrdb::Result<()> {
//! let store = Store::new("cidr.db");
//! let mut index = store.read()?;
//!
//! index.put("10.0.0.0/8".parse()?);
//! for cidr in index.lookup("10.1.2.3".parse().unwrap()) {
//!     println!("{}", cidr);
//! }
//! store.commit(&index)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment
//!
//! Setting `DEBUG` to any non-empty value makes the binaries log
//! diagnostic traces (record reads, commits, membership probes) to
//! standard error.

mod addr;
mod error;
mod index;

pub mod compile;
pub mod server;
pub mod store;

pub use addr::{format_ipv4, parse_ipv4, Cidr};
pub use compile::{compile, compile_file, CompileStats};
pub use error::{Error, Result};
pub use index::PrefixIndex;
pub use server::{create_router, serve, AppState};
pub use store::Store;
