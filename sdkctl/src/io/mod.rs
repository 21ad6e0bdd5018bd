//! I/O helpers for sdkctl commands.

pub mod command;
pub mod config;
pub mod files;
pub mod manifest;
pub mod process;
