//! In-place updates of the package manifest, lock file and README.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::manifest::{set_lock_version, set_package_version};
use crate::core::readme::{ReadmeRewrite, rewrite_readme};
use crate::core::version::Version;
use crate::io::files::{read_json, write_atomic, write_json};

/// Set `version` in `package.json`.
pub fn bump_package_json(path: &Path, version: &Version) -> Result<()> {
    let mut doc = read_json(path)?;
    set_package_version(&mut doc, version).with_context(|| format!("update {}", path.display()))?;
    write_json(path, &doc)?;
    info!(path = %path.display(), %version, "bumped package manifest");
    Ok(())
}

/// Set `version` and `packages[""].version` in `package-lock.json`.
pub fn bump_package_lock_json(path: &Path, version: &Version) -> Result<()> {
    let mut doc = read_json(path)?;
    set_lock_version(&mut doc, version).with_context(|| format!("update {}", path.display()))?;
    write_json(path, &doc)?;
    info!(path = %path.display(), %version, "bumped lock file");
    Ok(())
}

/// Rewrite the pinned version and integrity hash in the README.
pub fn update_read_me(
    path: &Path,
    version: &Version,
    hash: &str,
    package: &str,
) -> Result<ReadmeRewrite> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rewrite = rewrite_readme(&contents, package, version, hash)?;
    write_atomic(path, &rewrite.contents)?;

    if rewrite.version_replacements == 0 {
        warn!(path = %path.display(), package, "no pinned version found in readme");
    }
    if rewrite.hash_replacements == 0 {
        warn!(path = %path.display(), "no sha384 integrity attribute found in readme");
    }
    info!(
        path = %path.display(),
        versions = rewrite.version_replacements,
        hashes = rewrite.hash_replacements,
        "updated readme"
    );
    Ok(rewrite)
}
