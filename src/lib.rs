//! Tessellate: project lifecycle reconciliation for a freelance marketplace.
//!
//! This crate recomputes the lifecycle status of every active project from
//! the clock, its scheduled milestones, and the freelancer applications it
//! has received. It selects the winning freelancer when work starts, rejects
//! competing bids, and cancels projects left expired for too long.
//!
//! # Architecture
//!
//! Tessellate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`project`]: Lifecycle status rules, the reconciliation engine, and its
//!   scheduler
//! - [`config`]: Environment-driven worker configuration

pub mod config;
pub mod project;
