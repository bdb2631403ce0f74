//! Deterministic, pure logic for the injection engine.
//!
//! Core modules are free of I/O. They describe faults, manifests and template
//! annotations as in-memory data and return deterministic outputs.

pub mod builtins;
pub mod fingerprint;
pub mod invariants;
pub mod manifest;
pub mod metadata;
pub mod path;
pub mod registry;
pub mod types;
