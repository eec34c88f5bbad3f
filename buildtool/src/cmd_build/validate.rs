//! Config validation
//!
//! Field presence and value types are already checked by
//! deserialization; everything here is a cross-field check.
use buildcommon::prelude::*;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Error;

use super::config::Config;

pub fn run(config: &Config) -> Result<(), Error> {
    config.unused.check();

    let name_re = Regex::new(r"^[A-Za-z0-9_-]+$").change_context(Error::Validate)?;

    let mut errors = 0usize;

    if config.builds.is_empty() {
        errorln!("Error", "no [[builds]] defined");
        errors += 1;
    }

    let mut names: FxHashSet<&str> = FxHashSet::default();
    for build in &config.builds {
        build.unused.check_prefixed(&format!("builds.{}", build.name));

        if !name_re.is_match(&build.name) {
            errorln!(
                "Error",
                "build name `{}` is invalid (allowed: letters, digits, `_` and `-`)",
                build.name
            );
            errors += 1;
        }

        if !names.insert(&build.name) {
            errorln!("Error", "build name `{}` is used more than once", build.name);
            errors += 1;
        }

        if build.sources.is_empty() {
            errorln!("Error", "build `{}` has no source directories", build.name);
            errors += 1;
        }

        if !build.rule.links() && (!build.libraries.is_empty() || !build.libpaths.is_empty()) {
            errorln!(
                "Error",
                "build `{}` is a {} and does not link",
                build.name,
                build.rule.name()
            );
            hintln!(
                "Consider",
                "Move `libraries`/`libpaths` to the builds that link against `{}`",
                build.name
            );
            errors += 1;
        }

        for req in &build.requires {
            if config.find_build(req).is_none() {
                errorln!(
                    "Error",
                    "build `{}` requires `{}` which does not match any build name",
                    build.name,
                    req
                );
                hintln!("Consider", "Check the spelling of `{}`", req);
                errors += 1;
            }
        }
    }

    // a requires cycle would make the build order undefined; only
    // meaningful to check once the graph is otherwise valid
    if errors == 0 {
        let mut state: FxHashMap<&str, Mark> = FxHashMap::default();
        for build in &config.builds {
            if has_cycle(config, &build.name, &mut state) {
                errorln!("Error", "dependency cycle involving build `{}`", build.name);
                errors += 1;
                break;
            }
        }
    }

    if errors > 0 {
        errorln!(
            "Failed",
            "Validating Anvil.toml: {} error{}",
            errors,
            if errors == 1 { "" } else { "s" }
        );
        return Err(report!(Error::Validate)).attach_printable("see the errors above");
    }

    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

fn has_cycle<'a>(
    config: &'a Config,
    name: &'a str,
    state: &mut FxHashMap<&'a str, Mark>,
) -> bool {
    match state.get(name) {
        Some(Mark::Visiting) => return true,
        Some(Mark::Done) => return false,
        None => {}
    }
    state.insert(name, Mark::Visiting);

    if let Some(build) = config.find_build(name) {
        for req in &build.requires {
            if has_cycle(config, req, state) {
                return true;
            }
        }
    }

    state.insert(name, Mark::Done);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    static HEADER: &str = r#"
cxx = "g++"
cc = "gcc"
ar = "ar"
frontend = "gcc"
"#;

    fn with_builds(builds: &str) -> Config {
        config(&format!("{}\n{}", HEADER, builds))
    }

    #[test]
    fn accepts_valid_config() {
        let config = with_builds(
            r#"
[[builds]]
name = "lib"
rule = "staticlib"
output = "libproject.a"
sources = ["src"]

[[builds]]
name = "app"
rule = "exe"
output = "app"
requires = ["lib"]
sources = ["app"]
"#,
        );
        assert!(run(&config).is_ok());
    }

    #[test]
    fn rejects_empty_builds() {
        let config = with_builds("");
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let config = with_builds(
            r#"
[[builds]]
name = "app"
rule = "exe"
output = "app"
sources = ["a"]

[[builds]]
name = "app"
rule = "exe"
output = "app2"
sources = ["b"]
"#,
        );
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_invalid_name() {
        let config = with_builds(
            r#"
[[builds]]
name = "my app"
rule = "exe"
output = "app"
sources = ["src"]
"#,
        );
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_unknown_requirement() {
        let config = with_builds(
            r#"
[[builds]]
name = "app"
rule = "exe"
output = "app"
requires = ["lib"]
sources = ["src"]
"#,
        );
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_missing_sources() {
        let config = with_builds(
            r#"
[[builds]]
name = "app"
rule = "exe"
output = "app"
"#,
        );
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_linking_staticlib() {
        let config = with_builds(
            r#"
[[builds]]
name = "lib"
rule = "staticlib"
output = "libproject.a"
sources = ["src"]
libraries = ["libother.a"]
"#,
        );
        assert!(run(&config).is_err());
    }

    #[test]
    fn rejects_requires_cycle() {
        let config = with_builds(
            r#"
[[builds]]
name = "a"
rule = "exe"
output = "a"
requires = ["b"]
sources = ["a"]

[[builds]]
name = "b"
rule = "exe"
output = "b"
requires = ["a"]
sources = ["b"]
"#,
        );
        assert!(run(&config).is_err());
    }
}
