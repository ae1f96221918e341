//! Project lifecycle reconciliation.
//!
//! A periodic job walks every project that has not reached a terminal
//! status and recomputes its lifecycle status from the clock, its milestone
//! dates, and the state of its freelancer applications. When work starts the
//! accepted application wins the project and every competing bid is
//! rejected; projects left expired for too long are cancelled. The module
//! follows hexagonal architecture:
//!
//! - Domain types and the status rules in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The engine and its scheduler in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
