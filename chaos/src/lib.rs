//! Fault injection and restoration for a target web project.
//!
//! A registry of named faults describes which project files to replace and
//! with which broken templates. Injection snapshots the targets first and
//! records a manifest; restoration reverses exactly that manifest.
//!
//! - **[`core`]**: Pure logic (fault table, manifest model, annotation parsing).
//! - **[`io`]**: Filesystem access (file store, templates, backups, config).
//!
//! Orchestration modules ([`inject`], [`restore`]) combine both to implement
//! CLI commands; [`report`] renders their results.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod inject;
pub mod io;
pub mod logging;
pub mod report;
pub mod restore;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
