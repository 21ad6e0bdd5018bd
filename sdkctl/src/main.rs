//! sdkctl: release-version bumping and cucumber harness launching for the
//! JavaScript SDK repository.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};

use sdkctl::bump::{BumpRequest, HashSource, bundle_hash, run_bump};
use sdkctl::core::integrity::SRI_PREFIX;
use sdkctl::exit_codes;
use sdkctl::harness::{StepError, process_runner, run_all, run_setup, run_tests};
use sdkctl::init::init_config;
use sdkctl::io::config::{BumpConfig, CONFIG_FILE, load_config};
use sdkctl::logging;

#[derive(Parser)]
#[command(
    name = "sdkctl",
    version,
    about = "Release and test-harness tooling for the JavaScript SDK"
)]
struct Cli {
    /// Path to the sdkctl config file.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Update the version in package.json, package-lock.json and the README
    /// install snippet, plus the README integrity hash.
    Bump(BumpArgs),
    /// Install the SDK and run the cucumber test suite.
    Harness {
        #[command(subcommand)]
        command: HarnessCommand,
    },
    /// Print the sha384 subresource-integrity value of a file.
    Integrity { file: PathBuf },
    /// Write a default sdkctl.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("hash").required(true).args(["new_hash", "bundle"])))]
struct BumpArgs {
    /// New version as major.minor.patch.
    new_version: String,
    /// New integrity hash for the build (the part after `sha384-`).
    #[arg(long = "new_hash", visible_alias = "new-hash", value_name = "HASH")]
    new_hash: Option<String>,
    /// Compute the integrity hash from this built bundle instead.
    #[arg(long, value_name = "FILE")]
    bundle: Option<PathBuf>,
    /// Path to the README [default: from config, README.md].
    #[arg(long = "read_me", visible_alias = "read-me", value_name = "PATH")]
    read_me: Option<PathBuf>,
    /// Path to package.json [default: from config, package.json].
    #[arg(long = "package_json", visible_alias = "package-json", value_name = "PATH")]
    package_json: Option<PathBuf>,
    /// Path to package-lock.json [default: from config, package-lock.json].
    #[arg(
        long = "package_lock_json",
        visible_alias = "package-lock-json",
        value_name = "PATH"
    )]
    package_lock_json: Option<PathBuf>,
    /// Package name pinned in the README snippet [default: from config, algosdk].
    #[arg(long = "package-name", value_name = "NAME")]
    package_name: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum HarnessCommand {
    /// Install SDK dependencies, then install the SDK into the working directory.
    Setup,
    /// Run the cucumber suite.
    Test,
    /// Setup followed by test.
    All,
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Bump(args) => cmd_bump(&cli.config, args),
        Command::Harness { command } => cmd_harness(&cli.config, command),
        Command::Integrity { file } => cmd_integrity(&file),
        Command::Init { force } => init_config(&cli.config, force),
    }
}

fn cmd_bump(config_path: &Path, args: BumpArgs) -> Result<()> {
    let cfg = load_config(config_path)?;
    let request = bump_request(&cfg.bump, args);
    let outcome = run_bump(&request)?;
    println!(
        "bump: version={} integrity={}{} files={}",
        outcome.version,
        SRI_PREFIX,
        outcome.hash,
        outcome.files.len()
    );
    Ok(())
}

fn bump_request(cfg: &BumpConfig, args: BumpArgs) -> BumpRequest {
    // clap's ArgGroup guarantees exactly one of the two is present.
    let hash = match (args.new_hash, args.bundle) {
        (_, Some(bundle)) => HashSource::Bundle(bundle),
        (hash, None) => HashSource::Literal(hash.unwrap_or_default()),
    };
    let mut request = BumpRequest::from_config(cfg, args.new_version, hash);
    if let Some(path) = args.package_json {
        request.package_json = path;
    }
    if let Some(path) = args.package_lock_json {
        request.package_lock_json = path;
    }
    if let Some(path) = args.read_me {
        request.read_me = path;
    }
    if let Some(name) = args.package_name {
        request.package_name = name;
    }
    request
}

fn cmd_harness(config_path: &Path, command: HarnessCommand) -> Result<()> {
    let cfg = load_config(config_path)?;
    let runner = process_runner(&cfg.harness);
    match command {
        HarnessCommand::Setup => run_setup(&cfg.harness, &runner),
        HarnessCommand::Test => run_tests(&cfg.harness, &runner),
        HarnessCommand::All => run_all(&cfg.harness, &runner),
    }
}

fn cmd_integrity(file: &Path) -> Result<()> {
    println!("{}{}", SRI_PREFIX, bundle_hash(file)?);
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<StepError>().is_some() {
        exit_codes::CHILD_FAILED
    } else {
        exit_codes::INVALID
    }
}
