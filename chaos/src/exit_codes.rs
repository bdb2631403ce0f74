//! Stable exit codes for chaos CLI commands.

/// Command succeeded, including "nothing to restore" and a declined restore.
pub const OK: i32 = 0;
/// Filesystem, config, manifest or other failure.
pub const FAILURE: i32 = 1;
/// Requested fault id is not registered.
pub const UNKNOWN_FAULT: i32 = 2;
/// `chaos inject` refused because an injection is still pending.
pub const ALREADY_INJECTED: i32 = 3;
/// `chaos templates` found at least one invalid template.
pub const INVALID_TEMPLATES: i32 = 4;
