//! In-memory adapters for project reconciliation ports.

mod storage;

pub use storage::InMemoryProjectStorage;
