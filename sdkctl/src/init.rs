//! `sdkctl init`: write a default `sdkctl.toml`.

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::io::config::{Config, write_config};

/// Write the default config to `path`.
///
/// Fails if `path` already exists unless `force` is set.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow!(
            "sdkctl init: {} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    write_config(path, &Config::default())?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}
