//! Harness invocation planning.
//!
//! Turns the configured directory layout into the exact subprocesses the
//! harness launcher runs. Nothing here touches the filesystem: step files
//! are listed by the caller and passed in.

use std::fmt;
use std::path::{Path, PathBuf};

/// Directories and programs the cucumber harness works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessLayout {
    /// SDK checkout whose dependencies are installed and which is installed as a package.
    pub source_dir: PathBuf,
    /// Directory of `.feature` files handed to the test runner.
    pub features_dir: PathBuf,
    /// Directory of step-definition modules.
    pub steps_dir: PathBuf,
    /// Directory the SDK gets installed into and the test runner runs from.
    pub workdir: PathBuf,
    pub npm: String,
    /// Test runner executable, relative to `workdir` unless absolute.
    pub cucumber_bin: PathBuf,
}

/// A single subprocess to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Short name used in logs and error messages.
    pub label: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Dependency installation: the SDK's own dependencies, then the SDK itself
/// installed into `workdir`.
pub fn setup_plan(layout: &HarnessLayout) -> Vec<Invocation> {
    vec![
        Invocation {
            label: "install sdk dependencies".to_string(),
            program: PathBuf::from(&layout.npm),
            args: vec!["install".to_string(), "--silent".to_string()],
            cwd: layout.source_dir.clone(),
        },
        Invocation {
            label: "install sdk package".to_string(),
            program: PathBuf::from(&layout.npm),
            args: vec![
                "install".to_string(),
                path_arg(&layout.source_dir),
                "--silent".to_string(),
            ],
            cwd: layout.workdir.clone(),
        },
    ]
}

/// Test runner invocation with one `--require` per step file.
pub fn test_plan(layout: &HarnessLayout, step_files: &[PathBuf]) -> Invocation {
    let mut args = vec![path_arg(&layout.features_dir)];
    for file in step_files {
        args.push("--require".to_string());
        args.push(path_arg(file));
    }
    Invocation {
        label: "run cucumber".to_string(),
        program: layout.workdir.join(&layout.cucumber_bin),
        args,
        cwd: layout.workdir.clone(),
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
