//! Orchestration for `sdkctl bump`.
//!
//! Validates the new version, then rewrites `package.json`,
//! `package-lock.json` and the README in that order. The three updates are
//! independent: if a later one fails, earlier files stay rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::integrity::sri_sha384;
use crate::core::version::{Version, validate_version};
use crate::io::config::BumpConfig;
use crate::io::manifest::{bump_package_json, bump_package_lock_json, update_read_me};

/// Where the README integrity hash comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashSource {
    /// Hash given verbatim (the part after `sha384-`).
    Literal(String),
    /// Hash computed from a built bundle.
    Bundle(PathBuf),
}

/// Inputs for a version bump.
#[derive(Debug, Clone)]
pub struct BumpRequest {
    pub version: String,
    pub hash: HashSource,
    pub package_json: PathBuf,
    pub package_lock_json: PathBuf,
    pub read_me: PathBuf,
    pub package_name: String,
}

impl BumpRequest {
    /// Request using the configured file locations.
    pub fn from_config(cfg: &BumpConfig, version: impl Into<String>, hash: HashSource) -> Self {
        Self {
            version: version.into(),
            hash,
            package_json: cfg.package_json.clone(),
            package_lock_json: cfg.package_lock_json.clone(),
            read_me: cfg.read_me.clone(),
            package_name: cfg.package_name.clone(),
        }
    }
}

/// Outcome of a successful bump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpOutcome {
    pub version: Version,
    pub hash: String,
    /// Files rewritten, in write order.
    pub files: Vec<PathBuf>,
    pub readme_version_replacements: usize,
    pub readme_hash_replacements: usize,
}

/// Run a version bump.
#[instrument(skip_all, fields(version = %request.version))]
pub fn run_bump(request: &BumpRequest) -> Result<BumpOutcome> {
    let version = validate_version(&request.version)?;
    let hash = resolve_hash(&request.hash)?;
    debug!(%hash, "resolved integrity hash");

    bump_package_json(&request.package_json, &version)?;
    bump_package_lock_json(&request.package_lock_json, &version)?;
    let rewrite = update_read_me(&request.read_me, &version, &hash, &request.package_name)?;

    info!("version bump complete");
    Ok(BumpOutcome {
        version,
        hash,
        files: vec![
            request.package_json.clone(),
            request.package_lock_json.clone(),
            request.read_me.clone(),
        ],
        readme_version_replacements: rewrite.version_replacements,
        readme_hash_replacements: rewrite.hash_replacements,
    })
}

/// Compute the subresource-integrity digest of a bundle file.
pub fn bundle_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read bundle {}", path.display()))?;
    Ok(sri_sha384(&bytes))
}

fn resolve_hash(source: &HashSource) -> Result<String> {
    match source {
        HashSource::Literal(hash) => Ok(hash.clone()),
        HashSource::Bundle(path) => bundle_hash(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ReleaseFixture;

    #[test]
    fn bump_rewrites_all_three_files() {
        let fixture = ReleaseFixture::new().expect("fixture");
        let outcome = run_bump(&fixture.request("1.2.3", HashSource::Literal("NEWHASH".into())))
            .expect("bump");

        assert_eq!(outcome.version.as_str(), "1.2.3");
        assert_eq!(outcome.files.len(), 3);
        assert_eq!(outcome.readme_version_replacements, 1);
        assert_eq!(outcome.readme_hash_replacements, 1);

        let package = fixture.read_json(&fixture.package_json);
        assert_eq!(package["version"], "1.2.3");
        let lock = fixture.read_json(&fixture.package_lock_json);
        assert_eq!(lock["version"], "1.2.3");
        assert_eq!(lock["packages"][""]["version"], "1.2.3");
        let readme = fixture.read_text(&fixture.read_me);
        assert!(readme.contains("algosdk@v1.2.3"));
        assert!(readme.contains(r#"integrity="sha384-NEWHASH""#));
    }

    #[test]
    fn invalid_version_touches_nothing() {
        let fixture = ReleaseFixture::new().expect("fixture");
        let before = fixture.snapshot();

        for bad in ["1.2", "v1.2.3", "1.2.3!"] {
            let err = run_bump(&fixture.request(bad, HashSource::Literal("H".into()))).unwrap_err();
            assert!(err.to_string().contains("does not match"));
        }

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn missing_lock_file_leaves_manifest_bumped_and_readme_untouched() {
        let fixture = ReleaseFixture::new().expect("fixture");
        fs::remove_file(&fixture.package_lock_json).expect("remove lock");
        let readme_before = fixture.read_text(&fixture.read_me);

        let err = run_bump(&fixture.request("1.2.3", HashSource::Literal("H".into()))).unwrap_err();
        assert!(format!("{err:#}").contains("package-lock.json"));

        assert_eq!(fixture.read_json(&fixture.package_json)["version"], "1.2.3");
        assert_eq!(fixture.read_text(&fixture.read_me), readme_before);
    }

    #[test]
    fn bundle_hash_is_written_to_readme() {
        let fixture = ReleaseFixture::new().expect("fixture");
        let bundle = fixture.root().join("algosdk.min.js");
        fs::write(&bundle, "abc").expect("bundle");

        let outcome =
            run_bump(&fixture.request("2.0.0", HashSource::Bundle(bundle))).expect("bump");
        assert_eq!(
            outcome.hash,
            "ywB1P0WjXou1oD1pmsZQBycsMqsO3tFjGotgWkP/W+2AhgcroefMI1i67KE0yCWn"
        );
        assert!(
            fixture
                .read_text(&fixture.read_me)
                .contains(&format!(r#"integrity="sha384-{}""#, outcome.hash))
        );
    }

    #[test]
    fn missing_bundle_fails_before_any_write() {
        let fixture = ReleaseFixture::new().expect("fixture");
        let before = fixture.snapshot();
        let missing = fixture.root().join("dist/missing.js");

        assert!(run_bump(&fixture.request("2.0.0", HashSource::Bundle(missing))).is_err());
        assert_eq!(fixture.snapshot(), before);
    }
}
