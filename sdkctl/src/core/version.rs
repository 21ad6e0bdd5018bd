//! Release version validation.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;

/// Pattern a release version must match in full (`major.minor.patch[-suffix]`).
pub const VERSION_PATTERN: &str = r"[0-9]+\.[0-9]+\.[-a-z.0-9]+";

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^(?:{VERSION_PATTERN})$")).unwrap());

/// A version string that has passed [`validate_version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version(String);

impl Version {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check `raw` against [`VERSION_PATTERN`] and wrap it on success.
pub fn validate_version(raw: &str) -> Result<Version> {
    if !VERSION_RE.is_match(raw) {
        return Err(anyhow!(
            "The version does not match the regex(major.minor.patch): {VERSION_PATTERN}"
        ));
    }
    Ok(Version(raw.to_string()))
}
