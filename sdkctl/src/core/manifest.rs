//! Version fields inside package manifest and lock documents.

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::core::version::Version;

/// Set the top-level `version` of a package manifest.
pub fn set_package_version(doc: &mut Value, version: &Version) -> Result<()> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| anyhow!("manifest root must be a JSON object"))?;
    root.insert("version".to_string(), Value::from(version.as_str()));
    Ok(())
}

/// Set both the top-level `version` and `packages[""].version` of a lock document.
pub fn set_lock_version(doc: &mut Value, version: &Version) -> Result<()> {
    set_package_version(doc, version)?;
    let root_package = doc
        .get_mut("packages")
        .ok_or_else(|| anyhow!("lock file has no `packages` object"))?
        .get_mut("")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow!("lock file has no `packages[\"\"]` object"))?;
    root_package.insert("version".to_string(), Value::from(version.as_str()));
    Ok(())
}
