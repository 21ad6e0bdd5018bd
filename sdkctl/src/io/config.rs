//! sdkctl configuration stored in `sdkctl.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::plan::HarnessLayout;
use crate::io::files::write_atomic;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "sdkctl.toml";

/// sdkctl configuration (TOML).
///
/// Every field has a default, so a missing file or a partial file is valid.
/// Command-line flags take precedence over values loaded here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub bump: BumpConfig,
    pub harness: HarnessConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BumpConfig {
    pub package_json: PathBuf,
    pub package_lock_json: PathBuf,
    pub read_me: PathBuf,
    /// Package name pinned in the README install snippet (`<name>@v<version>`).
    pub package_name: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            package_json: PathBuf::from("package.json"),
            package_lock_json: PathBuf::from("package-lock.json"),
            read_me: PathBuf::from("README.md"),
            package_name: "algosdk".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    pub source_dir: PathBuf,
    pub features_dir: PathBuf,
    pub steps_dir: PathBuf,
    pub workdir: PathBuf,
    pub npm: String,
    pub cucumber_bin: PathBuf,

    /// Per-subprocess wall-clock limit. Unset means wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Keep at most this many bytes of each child stream for error reports.
    pub output_limit_bytes: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let source_dir = PathBuf::from("/opt/js-algorand-sdk");
        Self {
            features_dir: source_dir.join("tests/cucumber/features"),
            steps_dir: source_dir.join("tests/cucumber/steps"),
            source_dir,
            workdir: PathBuf::from("."),
            npm: "npm".to_string(),
            cucumber_bin: PathBuf::from("node_modules/.bin/cucumber-js"),
            timeout_secs: None,
            output_limit_bytes: 100_000,
        }
    }
}

impl HarnessConfig {
    pub fn layout(&self) -> HarnessLayout {
        HarnessLayout {
            source_dir: self.source_dir.clone(),
            features_dir: self.features_dir.clone(),
            steps_dir: self.steps_dir.clone(),
            workdir: self.workdir.clone(),
            npm: self.npm.clone(),
            cucumber_bin: self.cucumber_bin.clone(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.bump.package_name.trim().is_empty() {
            return Err(anyhow!("bump.package_name must not be empty"));
        }
        if self.harness.npm.trim().is_empty() {
            return Err(anyhow!("harness.npm must not be empty"));
        }
        if self.harness.cucumber_bin.as_os_str().is_empty() {
            return Err(anyhow!("harness.cucumber_bin must not be empty"));
        }
        if self.harness.timeout_secs == Some(0) {
            return Err(anyhow!("harness.timeout_secs must be > 0 when set"));
        }
        if self.harness.output_limit_bytes == 0 {
            return Err(anyhow!("harness.output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}
