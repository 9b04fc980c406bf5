//! Saving and restoring learned tables.

mod snapshot;
mod store;

pub use snapshot::{AgentSnapshot, TableEntry};
pub use store::{JsonFileStore, MemoryStore, TableStore};
