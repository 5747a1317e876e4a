//! Persistence backends.
//!
//! - `file`: JSON files in the data directory, logbook as JSON lines
//! - `memory`: in-process storage (`--ephemeral` sessions and tests)

mod file;
mod memory;

pub use file::JsonStore;
pub use memory::MemoryStore;
