//! Data Transfer Objects
//!
//! Request payloads and query parameters sent to the fleet API.

pub mod deploy;
pub mod swarm;
