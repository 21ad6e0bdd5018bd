//! CLI tests for `sdkctl bump` and `sdkctl integrity`.
//!
//! Spawns the sdkctl binary against a temporary release checkout and verifies
//! exit codes and file contents.

use std::fs;
use std::process::{Command, Output};

use sdkctl::exit_codes;
use sdkctl::test_support::{PACKAGE_JSON, ReleaseFixture};

fn sdkctl(fixture: &ReleaseFixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sdkctl"))
        .current_dir(fixture.root())
        .args(args)
        .output()
        .expect("run sdkctl")
}

#[test]
fn bump_updates_release_files_in_current_directory() {
    let fixture = ReleaseFixture::new().expect("fixture");

    let output = sdkctl(&fixture, &["bump", "2.0.0", "--new_hash", "NEWHASH"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "bump: version=2.0.0 integrity=sha384-NEWHASH files=3\n"
    );

    let package = fixture.read_json(&fixture.package_json);
    assert_eq!(package["version"], "2.0.0");
    assert_eq!(package["name"], "algosdk");
    assert_eq!(
        package["scripts"]["test"],
        "node -r ts-node/register tests/mocha.js"
    );

    let lock = fixture.read_json(&fixture.package_lock_json);
    assert_eq!(lock["version"], "2.0.0");
    assert_eq!(lock["packages"][""]["version"], "2.0.0");
    assert_eq!(lock["packages"]["node_modules/tweetnacl"]["version"], "1.0.3");

    let readme = fixture.read_text(&fixture.read_me);
    assert!(readme.contains("https://unpkg.com/algosdk@v2.0.0/dist/browser/algosdk.min.js"));
    assert!(readme.contains(r#"integrity="sha384-NEWHASH""#));
    assert!(!readme.contains("OLDHASH"));
}

#[test]
fn bump_preserves_manifest_formatting() {
    let fixture = ReleaseFixture::new().expect("fixture");

    let output = sdkctl(&fixture, &["bump", "1.0.1", "--new_hash", "H"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let expected = PACKAGE_JSON.replace("\"version\": \"1.0.0\"", "\"version\": \"1.0.1\"");
    assert_eq!(fixture.read_text(&fixture.package_json), expected);
}

#[test]
fn invalid_version_exits_invalid_and_leaves_files() {
    let fixture = ReleaseFixture::new().expect("fixture");
    let before = fixture.snapshot();

    let output = sdkctl(&fixture, &["bump", "v1.2.3", "--new_hash", "H"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains(
        r"The version does not match the regex(major.minor.patch): [0-9]+\.[0-9]+\.[-a-z.0-9]+"
    ));
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn missing_readme_fails_after_json_files_are_bumped() {
    let fixture = ReleaseFixture::new().expect("fixture");
    fs::remove_file(&fixture.read_me).expect("remove readme");

    let output = sdkctl(&fixture, &["bump", "1.2.3", "--new_hash", "H"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("README.md"));

    assert_eq!(fixture.read_json(&fixture.package_json)["version"], "1.2.3");
    assert_eq!(
        fixture.read_json(&fixture.package_lock_json)["version"],
        "1.2.3"
    );
}

#[test]
fn paths_and_package_name_come_from_config_file() {
    let fixture = ReleaseFixture::new().expect("fixture");
    let docs = fixture.root().join("docs");
    fs::create_dir_all(&docs).expect("docs dir");
    fs::write(
        docs.join("INSTALL.md"),
        "cdn: mysdk@v0.9.0 integrity=\"sha384-OLD\"\n",
    )
    .expect("write install doc");
    fs::write(
        fixture.root().join("sdkctl.toml"),
        "[bump]\nread_me = \"docs/INSTALL.md\"\npackage_name = \"mysdk\"\n",
    )
    .expect("write config");

    let output = sdkctl(&fixture, &["bump", "1.0.0", "--new_hash", "NEW"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        fs::read_to_string(docs.join("INSTALL.md")).expect("read"),
        "cdn: mysdk@v1.0.0 integrity=\"sha384-NEW\"\n"
    );
}

#[test]
fn integrity_prints_sri_value() {
    let fixture = ReleaseFixture::new().expect("fixture");
    fs::write(fixture.root().join("bundle.js"), "abc").expect("bundle");

    let output = sdkctl(&fixture, &["integrity", "bundle.js"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "sha384-ywB1P0WjXou1oD1pmsZQBycsMqsO3tFjGotgWkP/W+2AhgcroefMI1i67KE0yCWn\n"
    );
}
