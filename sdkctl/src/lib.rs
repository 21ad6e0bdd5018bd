//! Release and test-harness tooling for the JavaScript SDK repository.
//!
//! - **[`core`]**: Pure, deterministic logic (version validation, manifest and
//!   README rewriting, integrity digests, harness planning). No I/O.
//! - **[`io`]**: Side-effecting operations (config, file writes, processes).
//!
//! Orchestration modules ([`bump`], [`harness`], [`init`]) combine the two to
//! implement CLI commands.

pub mod bump;
pub mod core;
pub mod exit_codes;
pub mod harness;
pub mod init;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
