//! Adapter implementations for project reconciliation ports.

pub mod memory;
pub mod postgres;
