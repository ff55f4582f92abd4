//! VR Core
//!
//! Core types and pure selection logic for the `vr` fleet tool.
//!
//! This crate contains:
//! - Domain types: swarms, ingredients, builds, releases, procs
//! - DTOs: queries and change sets sent to the fleet API
//! - Pattern filtering, ingredient set algebra and build deduplication

pub mod builds;
pub mod domain;
pub mod dto;
pub mod filter;
pub mod ingredients;
