//! Toolchain environment discovery and caching
use crate::prelude::*;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::system::Error;

/// Name of the project config file
pub const CONFIG_FILE: &str = "Anvil.toml";

/// Find the project root by walking up from `dir` until a directory
/// containing the config file is found
pub fn find_root(dir: &str) -> Result<PathBuf, Error> {
    let mut path = Path::new(dir).to_abs()?;
    loop {
        if path.join(CONFIG_FILE).is_file() {
            verboseln!("project root: {}", path.display());
            return Ok(path);
        }
        if !path.pop() {
            errorln!(
                "Failed",
                "No {} found in this or any parent directory",
                CONFIG_FILE
            );
            hintln!("Consider", "Run `anvil init <path>` to create a project");
            return Err(report!(Error::FindProjectRoot));
        }
    }
}

/// Toolchain environment of a project
///
/// The compiler and archiver names come from the project config;
/// ninja is looked up on PATH. Resolved paths are cached under the
/// build directory so repeated builds skip the lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct Env {
    /// Project root (the directory containing the config file)
    #[serde(skip)]
    pub root: PathBuf,

    /// Root of all generated build files (`<root>/build`)
    #[serde(skip)]
    pub build_root: PathBuf,

    /// Path to ninja
    pub ninja: PathBuf,

    /// Path to the C++ compiler
    pub cxx: PathBuf,

    /// Path to the C compiler
    pub cc: PathBuf,

    /// Path to the archiver
    pub ar: PathBuf,
}

impl Env {
    /// Load the environment from the cache file
    ///
    /// If no cache exists, or the config file changed since the cache
    /// was written, fall back to [`check`](Self::check) and re-create
    /// the cache with [`save`](Self::save)
    pub fn load(root: impl AsRef<Path>, cxx: &str, cc: &str, ar: &str) -> Result<Self, Error> {
        let root = root.as_ref();
        if let Some(env) = Self::load_from_cache(root)? {
            return Ok(env);
        }

        match Self::check(root, cxx, cc, ar)? {
            Some(env) => {
                env.save();
                Ok(env)
            }
            None => {
                errorln!("Failed", "Cannot initialize environment");
                hintln!("Consider", "Fix the issues above and try again");
                Err(report!(Error::InitEnv))
            }
        }
    }

    fn load_from_cache(root: &Path) -> Result<Option<Self>, Error> {
        let cache_path = cache_path_from(root);
        if !cache_path.exists() {
            return Ok(None);
        }

        // a config edit may have switched compilers, recheck in that case
        let config_mtime = system::get_mtime(root.join(CONFIG_FILE))?;
        let cache_mtime = system::get_mtime(&cache_path)?;
        if !system::up_to_date(config_mtime, cache_mtime) {
            verboseln!("env cache is stale");
            return Ok(None);
        }

        verboseln!("found cached env: {}", cache_path.display());
        let reader = system::buf_reader(&cache_path)?;
        match serde_yaml_ng::from_reader::<_, Self>(reader) {
            Ok(mut env) => {
                env.root = root.to_path_buf();
                env.build_root = root.join("build");
                Ok(Some(env))
            }
            Err(e) => {
                verboseln!("failed to parse cached env: {}", e);
                verboseln!("falling back to check");
                Ok(None)
            }
        }
    }

    /// Check the toolchain and required tools.
    ///
    /// If the check fails, returns Ok(None)
    pub fn check(
        root: impl AsRef<Path>,
        cxx: &str,
        cc: &str,
        ar: &str,
    ) -> Result<Option<Self>, Error> {
        let root = root.as_ref();
        infoln!("Root", "{}", root.display());

        let mut ok = true;

        let ninja = match which::which("ninja") {
            Ok(p) => {
                infoln!("OK", "Found ninja");
                p
            }
            Err(_) => {
                ok = false;
                errorln!("Missing", "ninja");
                hintln!("Fix", "Please install ninja-build");
                PathBuf::new()
            }
        };

        let cxx = resolve_tool("C++ compiler", cxx, &mut ok);
        let cc = resolve_tool("C compiler", cc, &mut ok);
        let ar = resolve_tool("archiver", ar, &mut ok);

        if !ok {
            return Ok(None);
        }

        Ok(Some(Self {
            root: root.to_path_buf(),
            build_root: root.join("build"),
            ninja,
            cxx,
            cc,
            ar,
        }))
    }

    /// Get the build directory for a named build
    #[inline]
    pub fn build_dir(&self, name: &str) -> PathBuf {
        self.build_root.join(name)
    }

    /// Save the environment to the cache file
    pub fn save(&self) {
        match self.save_internal() {
            Ok(_) => {
                infoln!("Cached", "Environment");
            }
            Err(e) => {
                hintln!("Failed", "Environment not cached");
                verboseln!("error: {}", e);
            }
        }
    }

    fn save_internal(&self) -> Result<(), Error> {
        system::ensure_directory(&self.build_root)?;
        let cache_path = self.cache_path();
        let writer = system::buf_writer(&cache_path)?;
        serde_yaml_ng::to_writer(writer, self)
            .change_context_lazy(|| Error::WriteFile(cache_path.display().to_string()))?;

        Ok(())
    }

    /// Get the path to the cache file
    fn cache_path(&self) -> PathBuf {
        cache_path_from(&self.root)
    }
}

fn cache_path_from(root: &Path) -> PathBuf {
    root.join("build").into_joined("env_cache.yml")
}

/// Resolve a tool from the config: bare names are looked up on PATH,
/// anything with a path separator is taken as a path
fn resolve_tool(what: &str, tool: &str, ok: &mut bool) -> PathBuf {
    let resolved = if tool.contains('/') || tool.contains('\\') {
        Path::new(tool).to_abs().ok()
    } else {
        which::which(tool).ok()
    };

    match resolved {
        Some(path) => {
            infoln!("OK", "Found {} ({})", what, tool);
            path
        }
        None => {
            *ok = false;
            errorln!("Missing", "{} ({})", what, tool);
            hintln!("Fix", "Install `{}` or fix the config", tool);
            PathBuf::new()
        }
    }
}
