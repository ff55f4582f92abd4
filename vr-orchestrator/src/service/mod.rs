//! Service Layer
//!
//! One module per `vr` command family. Services take the fleet client by
//! reference and never hold it.

pub mod build;
pub mod procs;
pub mod rebuild;
pub mod releases;
pub mod reswarm;
pub mod swarms;
pub mod uptests;
