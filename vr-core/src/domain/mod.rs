//! Core domain types
//!
//! These types mirror the resources exposed by the fleet API. They are shared
//! between the HTTP client (which fetches them) and the orchestrator (which
//! selects and mutates them).

pub mod build;
pub mod ingredient;
pub mod proc;
pub mod release;
pub mod swarm;
pub mod testrun;
