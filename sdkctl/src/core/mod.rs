//! Deterministic, pure logic shared by the sdkctl commands.
//!
//! Core modules must be free of I/O side effects. They operate on strings,
//! JSON values and plain structs and return deterministic outputs suitable
//! for tests.

pub mod integrity;
pub mod manifest;
pub mod plan;
pub mod readme;
pub mod version;
