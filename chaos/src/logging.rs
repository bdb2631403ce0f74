//! Diagnostic tracing for the chaos CLI.
//!
//! Two output channels, kept apart:
//!
//! - **Reports (stdout)**: rendered by [`crate::report`] and printed by `main`.
//!   Always shown, unaffected by `RUST_LOG`, safe to pipe.
//! - **Diagnostics (stderr, this module)**: `tracing` events from the io and
//!   orchestration layers. At the default `warn` level this surfaces missing
//!   targets, skipped snapshot copies, fingerprint mismatches and partial
//!   injections; `debug` adds every copy, write and manifest load.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber once, from `main`.
///
/// Reads `RUST_LOG`; unset or unparsable directives fall back to `warn`.
/// Targets are omitted since every event comes from this crate.
///
/// # Example
/// ```bash
/// RUST_LOG=chaos=debug chaos inject --type syntax-error
/// ```
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
