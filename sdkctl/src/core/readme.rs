//! README install-snippet rewriting.
//!
//! The README carries a CDN `<script>` snippet of the form
//! `.../<package>@v1.2.3/dist/browser/<package>.min.js" integrity="sha384-..."`.
//! Both the pinned version and the integrity digest are located by pattern
//! and replaced wherever they occur.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};

use crate::core::version::{VERSION_PATTERN, Version};

static INTEGRITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"integrity="sha384-.*?""#).unwrap());

/// Result of rewriting a README.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeRewrite {
    pub contents: String,
    /// Number of `<package>@v<version>` references replaced.
    pub version_replacements: usize,
    /// Number of `integrity="sha384-..."` attributes replaced.
    pub hash_replacements: usize,
}

/// Replace pinned `<package>@v...` versions and `sha384` integrity attributes.
pub fn rewrite_readme(
    contents: &str,
    package: &str,
    version: &Version,
    hash: &str,
) -> Result<ReadmeRewrite> {
    let pinned_re = Regex::new(&format!(r"{}@v{VERSION_PATTERN}", regex::escape(package)))
        .with_context(|| format!("build version pattern for package {package}"))?;

    let version_replacements = pinned_re.find_iter(contents).count();
    let pinned = format!("{package}@v{version}");
    let contents = pinned_re.replace_all(contents, NoExpand(pinned.as_str()));

    let hash_replacements = INTEGRITY_RE.find_iter(&contents).count();
    let integrity = format!(r#"integrity="sha384-{hash}""#);
    let contents = INTEGRITY_RE.replace_all(&contents, NoExpand(integrity.as_str()));

    Ok(ReadmeRewrite {
        contents: contents.into_owned(),
        version_replacements,
        hash_replacements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::validate_version;

    const README: &str = r#"# algosdk

## Browser

```html
<script
  src="https://unpkg.com/algosdk@v1.0.0/dist/browser/algosdk.min.js"
  integrity="sha384-OLDHASH"
  crossorigin="anonymous"
></script>
```

Pin `algosdk@v1.0.0` or newer. The `integrity` attribute is optional.
"#;

    fn version(raw: &str) -> Version {
        validate_version(raw).expect("valid version")
    }

    #[test]
    fn replaces_version_and_hash_only() {
        let out = rewrite_readme(README, "algosdk", &version("2.0.0"), "NEWHASH").expect("rewrite");

        let expected = README
            .replace("algosdk@v1.0.0", "algosdk@v2.0.0")
            .replace(r#"integrity="sha384-OLDHASH""#, r#"integrity="sha384-NEWHASH""#);
        assert_eq!(out.contents, expected);
        assert_eq!(out.version_replacements, 2);
        assert_eq!(out.hash_replacements, 1);
        assert!(out.contents.contains("The `integrity` attribute is optional."));
    }

    #[test]
    fn prerelease_versions_are_replaced_whole() {
        let readme = "cdn: algosdk@v1.0.0-beta.2/dist";
        let out = rewrite_readme(readme, "algosdk", &version("1.0.0"), "H").expect("rewrite");
        assert_eq!(out.contents, "cdn: algosdk@v1.0.0/dist");
    }

    #[test]
    fn dollar_signs_in_hash_are_literal() {
        let readme = r#"integrity="sha384-OLD""#;
        let out = rewrite_readme(readme, "algosdk", &version("1.0.0"), "a$1b").expect("rewrite");
        assert_eq!(out.contents, r#"integrity="sha384-a$1b""#);
    }

    #[test]
    fn integrity_match_is_non_greedy() {
        let readme = r#"<a integrity="sha384-OLD" data-x="keep">"#;
        let out = rewrite_readme(readme, "algosdk", &version("1.0.0"), "NEW").expect("rewrite");
        assert_eq!(out.contents, r#"<a integrity="sha384-NEW" data-x="keep">"#);
    }

    #[test]
    fn other_packages_are_untouched() {
        let readme = "npm i tweetnacl@v1.0.3 algosdk@v1.0.0";
        let out = rewrite_readme(readme, "algosdk", &version("3.0.0"), "H").expect("rewrite");
        assert_eq!(out.contents, "npm i tweetnacl@v1.0.3 algosdk@v3.0.0");
        assert_eq!(out.hash_replacements, 0);
    }
}
