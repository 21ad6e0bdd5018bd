//! Stable exit codes for sdkctl commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid input (version format, config) or an I/O/parse failure.
pub const INVALID: i32 = 1;
/// A harness subprocess exited non-zero, was killed, or timed out.
pub const CHILD_FAILED: i32 = 3;
