//! Config structures
use buildcommon::prelude::*;

use std::path::Path;

use buildcommon::flags::Frontend;
use buildcommon::Unused;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Config data read from Anvil.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The C++ compiler
    pub cxx: String,

    /// The C compiler
    pub cc: String,

    /// The archiver
    pub ar: String,

    /// Which argument spelling the toolchain understands
    pub frontend: Frontend,

    /// Flags passed to every compile of every build, as written
    #[serde(default)]
    pub flags: Vec<String>,

    /// Defines passed to every compile of every build
    #[serde(default)]
    pub defines: Vec<String>,

    /// The `[[builds]]` array
    #[serde(default)]
    pub builds: Vec<Build>,

    #[serde(flatten, default)]
    pub unused: Unused,
}

error_context!(pub LoadConfig, |r| -> Error {
    errorln!("Failed", "Loading Anvil.toml");
    r.change_context(Error::Config)
});
impl Config {
    /// Load a config from a file
    ///
    /// Prints formatted error message when failed
    pub fn from_path(path: impl AsRef<Path>) -> ResultIn<Self, LoadConfig> {
        let config = system::read_file(path)?;
        // print pretty toml error
        let config = toml::from_str(&config).map_err(|e| {
            for line in e.to_string().lines() {
                errorln!("Error", "{}", line);
            }
            e
        })?;

        Ok(config)
    }

    /// Find a build by name
    pub fn find_build(&self, name: &str) -> Option<&Build> {
        self.builds.iter().find(|b| b.name == name)
    }
}

/// One entry of the `[[builds]]` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Name of the build, which is also the name of its build directory
    pub name: String,

    /// What kind of artifact the build produces
    pub rule: BuildRule,

    /// File name of the produced artifact
    pub output: String,

    /// Names of builds that must be built before this one.
    ///
    /// Required library builds are linked automatically.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Source directories, relative to the project root
    #[serde(default)]
    pub sources: Vec<String>,

    /// Include directories, relative to the project root
    #[serde(default)]
    pub includes: Vec<String>,

    /// Extra library search paths, relative to the project root
    #[serde(default)]
    pub libpaths: Vec<String>,

    /// Extra libraries to link, by exact file name
    #[serde(default)]
    pub libraries: Vec<String>,

    /// Flags added on top of the global flags
    #[serde(default)]
    pub flags: Vec<String>,

    /// Defines added on top of the global defines
    #[serde(default)]
    pub defines: Vec<String>,

    #[serde(flatten, default)]
    pub unused: Unused,
}

/// The artifact kinds a build can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildRule {
    Exe,
    Staticlib,
    Dynamiclib,
}

impl BuildRule {
    pub fn name(self) -> &'static str {
        match self {
            Self::Exe => "exe",
            Self::Staticlib => "staticlib",
            Self::Dynamiclib => "dynamiclib",
        }
    }

    /// Whether the artifact is produced by the linker
    #[inline]
    pub fn links(self) -> bool {
        matches!(self, Self::Exe | Self::Dynamiclib)
    }

    /// Whether the artifact can be linked into other builds
    #[inline]
    pub fn is_library(self) -> bool {
        matches!(self, Self::Staticlib | Self::Dynamiclib)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: &str = r#"
cxx = "g++"
cc = "gcc"
ar = "ar"
frontend = "gcc"

flags = ["-std=c++17", "-g"]
defines = ["DEBUG"]

[[builds]]
name = "libproject"
rule = "dynamiclib"
output = "libproject.so"
sources = ["libproject"]
includes = ["libproject"]
defines = ["SHARED_EXPORT"]

[[builds]]
name = "app"
rule = "exe"
output = "app"
requires = ["libproject"]
sources = ["app"]
includes = ["libproject"]
"#;

    #[test]
    fn parses_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.frontend, Frontend::Gcc);
        assert_eq!(config.flags, ["-std=c++17", "-g"]);
        assert_eq!(config.builds.len(), 2);

        let lib = config.find_build("libproject").unwrap();
        assert_eq!(lib.rule, BuildRule::Dynamiclib);
        assert_eq!(lib.defines, ["SHARED_EXPORT"]);

        let app = config.find_build("app").unwrap();
        assert_eq!(app.rule, BuildRule::Exe);
        assert_eq!(app.requires, ["libproject"]);
        assert!(app.libraries.is_empty());

        assert!(config.find_build("nope").is_none());
    }

    #[test]
    fn rejects_unknown_frontend() {
        let toml = SAMPLE.replace("\"gcc\"", "\"xyz\"");
        assert!(toml::from_str::<Config>(&toml).is_err());
    }

    #[test]
    fn rejects_unknown_rule() {
        let toml = SAMPLE.replace("\"exe\"", "\"shared\"");
        assert!(toml::from_str::<Config>(&toml).is_err());
    }

    #[test]
    fn rejects_missing_toolchain() {
        let toml = SAMPLE.replace("cxx = \"g++\"", "");
        assert!(toml::from_str::<Config>(&toml).is_err());
    }
}
