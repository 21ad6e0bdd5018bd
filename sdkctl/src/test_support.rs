//! Test-only helpers: a temporary release checkout and a scripted command runner.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tempfile::TempDir;

use crate::bump::{BumpRequest, HashSource};
use crate::core::plan::Invocation;
use crate::io::command::{CommandRunner, RunStatus};

pub const PACKAGE_JSON: &str = r#"{
  "name": "algosdk",
  "version": "1.0.0",
  "description": "The official JavaScript SDK for Algorand",
  "main": "dist/cjs/index.js",
  "scripts": {
    "test": "node -r ts-node/register tests/mocha.js"
  }
}
"#;

pub const PACKAGE_LOCK_JSON: &str = r#"{
  "name": "algosdk",
  "version": "1.0.0",
  "lockfileVersion": 3,
  "requires": true,
  "packages": {
    "": {
      "name": "algosdk",
      "version": "1.0.0",
      "license": "MIT"
    },
    "node_modules/tweetnacl": {
      "version": "1.0.3"
    }
  }
}
"#;

pub const README: &str = r#"# js-algorand-sdk

## Installation

### Browser

```html
<script
  src="https://unpkg.com/algosdk@v1.0.0/dist/browser/algosdk.min.js"
  integrity="sha384-OLDHASH"
  crossorigin="anonymous"
></script>
```
"#;

/// A temporary directory holding `package.json`, `package-lock.json` and `README.md`.
pub struct ReleaseFixture {
    temp: TempDir,
    pub package_json: PathBuf,
    pub package_lock_json: PathBuf,
    pub read_me: PathBuf,
}

impl ReleaseFixture {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let package_json = temp.path().join("package.json");
        let package_lock_json = temp.path().join("package-lock.json");
        let read_me = temp.path().join("README.md");
        fs::write(&package_json, PACKAGE_JSON).context("write package.json")?;
        fs::write(&package_lock_json, PACKAGE_LOCK_JSON).context("write package-lock.json")?;
        fs::write(&read_me, README).context("write README.md")?;
        Ok(Self {
            temp,
            package_json,
            package_lock_json,
            read_me,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Bump request pointing at the fixture files.
    pub fn request(&self, version: &str, hash: HashSource) -> BumpRequest {
        BumpRequest {
            version: version.to_string(),
            hash,
            package_json: self.package_json.clone(),
            package_lock_json: self.package_lock_json.clone(),
            read_me: self.read_me.clone(),
            package_name: "algosdk".to_string(),
        }
    }

    pub fn read_text(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("read fixture file")
    }

    pub fn read_json(&self, path: &Path) -> Value {
        serde_json::from_str(&self.read_text(path)).expect("parse fixture json")
    }

    /// Current contents of the three release files (missing files read as `None`).
    pub fn snapshot(&self) -> Vec<Option<String>> {
        [&self.package_json, &self.package_lock_json, &self.read_me]
            .into_iter()
            .map(|path| fs::read_to_string(path).ok())
            .collect()
    }
}

/// Command runner that records invocations and replays queued statuses.
pub struct ScriptedRunner {
    statuses: RefCell<VecDeque<RunStatus>>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new(statuses: Vec<RunStatus>) -> Self {
        Self {
            statuses: RefCell::new(statuses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Invocations seen so far, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        self.calls.borrow_mut().push(invocation.clone());
        self.statuses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted status left for {}", invocation.label))
    }
}

/// Create step-definition files in `steps_dir`.
pub fn write_step_files(steps_dir: &Path, names: &[&str]) -> Result<()> {
    fs::create_dir_all(steps_dir)
        .with_context(|| format!("create {}", steps_dir.display()))?;
    for name in names {
        fs::write(steps_dir.join(name), "module.exports = {};\n")
            .with_context(|| format!("write step file {name}"))?;
    }
    Ok(())
}
