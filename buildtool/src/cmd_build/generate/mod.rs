//! Ninja file generation
//!
//! Every build gets a self-contained build.ninja under
//! `<root>/build/<name>/`, so ninja can run per build directory and
//! requirements are ordered by the build command.
use buildcommon::prelude::*;

use std::path::{Path, PathBuf};

use buildcommon::compdb::CompileDb;
use buildcommon::env::Env;
use buildcommon::flags::{Flags, Frontend};
use buildcommon::source::SourceFile;
use filetime::FileTime;
use walkdir::WalkDir;

use crate::error::Error;

use super::config::{Build, Config};

mod gcc;
mod msvc;

/// Writes one build.ninja per build, plus the compile database at the
/// build root
pub struct Generator<'a> {
    env: &'a Env,
    config: &'a Config,
    config_path: &'a Path,
}

error_context!(pub Generate, |r| -> Error {
    errorln!("Failed", "Generating ninja files");
    r.change_context(Error::Generate)
});

impl<'a> Generator<'a> {
    pub fn new(env: &'a Env, config: &'a Config, config_path: &'a Path) -> Self {
        Self {
            env,
            config,
            config_path,
        }
    }

    pub fn run(&self) -> ResultIn<(), Generate> {
        let config_mtime = system::get_mtime(self.config_path)?;
        let mut compdb = CompileDb::default();

        for build in &self.config.builds {
            self.generate_build(build, config_mtime, &mut compdb)?;
        }

        compdb.save(self.env.build_root.join("compile_commands.json"));

        Ok(())
    }

    fn generate_build(
        &self,
        build: &Build,
        config_mtime: Option<FileTime>,
        compdb: &mut CompileDb,
    ) -> ResultIn<(), Generate> {
        let inputs = BuildInputs::prepare(self.env, self.config, build)?;

        // compile commands are collected even when the ninja file is
        // up to date, the compile database covers all builds
        let content = match self.config.frontend {
            Frontend::Gcc => gcc::generate(self.env, &inputs, compdb)?,
            Frontend::Msvc => msvc::generate(self.env, &inputs, compdb)?,
        };

        let ninja_path = inputs.build_dir.join("build.ninja");
        if system::up_to_date(config_mtime, system::get_mtime(&ninja_path)?) {
            verboseln!("'{}' is up to date", ninja_path.display());
            return Ok(());
        }

        system::write_file(&ninja_path, &content)?;
        infoln!(
            "Configured",
            "{}",
            ninja_path.rebase(&self.env.root).display()
        );

        Ok(())
    }
}

/// Everything about one build resolved to absolute paths, ready to be
/// rendered by a frontend
pub(super) struct BuildInputs<'a> {
    pub build: &'a Build,

    /// The build directory (`<root>/build/<name>`)
    pub build_dir: PathBuf,

    /// Absolute path of the produced artifact
    pub output: String,

    /// Discovered source files
    pub sources: Vec<SourceFile>,

    /// Absolute object paths, parallel to `sources`
    pub objects: Vec<String>,

    /// Flags rendered for the configured frontend
    pub flags: Flags,

    /// Absolute artifact paths of required library builds
    pub required: Vec<String>,
}

impl<'a> BuildInputs<'a> {
    fn prepare(env: &Env, config: &Config, build: &'a Build) -> ResultIn<Self, Generate> {
        let build_dir = env.build_dir(&build.name);
        let obj_dir = build_dir.join("o");
        system::ensure_directory(&obj_dir)?;

        let mut sources = Vec::new();
        for dir in &build.sources {
            collect_sources(&env.root.join(dir), &mut sources)?;
        }
        if sources.is_empty() {
            errorln!("Error", "no source files found for build `{}`", build.name);
            hintln!(
                "Consider",
                "Check the `sources` paths of `{}` in Anvil.toml",
                build.name
            );
            Err(report!(Error::NoSources))?;
        }

        let mut objects = Vec::with_capacity(sources.len());
        for source in &sources {
            objects.push(obj_dir.join(format!("{}.o", source.name_hash)).to_utf8()?);
        }

        let mut flags = Flags::new(
            config.frontend,
            config
                .flags
                .iter()
                .chain(build.flags.iter())
                .map(String::as_str),
        );
        flags.add_defines(config.defines.iter().chain(build.defines.iter()));

        let mut includes = Vec::with_capacity(build.includes.len());
        for dir in &build.includes {
            includes.push(env.root.join(dir).to_utf8()?);
        }
        flags.add_includes(includes);

        let mut required = Vec::new();
        if build.rule.links() {
            // artifacts of required library builds are linked
            // automatically, extra libraries come from the config
            for req in &build.requires {
                let dep = match config.find_build(req) {
                    Some(dep) => dep,
                    None => continue,
                };
                if !dep.rule.is_library() {
                    continue;
                }
                let dep_dir = env.build_dir(&dep.name);
                flags.add_libpaths([dep_dir.to_utf8()?]);
                flags.add_libraries([dep.output.as_str()]);
                required.push(dep_dir.into_joined(&dep.output).to_utf8()?);
            }

            let mut libpaths = Vec::with_capacity(build.libpaths.len());
            for dir in &build.libpaths {
                libpaths.push(env.root.join(dir).to_utf8()?);
            }
            flags.add_libpaths(libpaths);
            flags.add_libraries(build.libraries.iter().map(String::as_str));
        }

        let output = build_dir.join(&build.output).to_utf8()?;

        Ok(Self {
            build,
            build_dir,
            output,
            sources,
            objects,
            flags,
            required,
        })
    }
}

fn collect_sources(dir: &Path, sources: &mut Vec<SourceFile>) -> ResultIn<(), Generate> {
    if !dir.is_dir() {
        hintln!("Warning", "source directory `{}` does not exist", dir.display());
        return Ok(());
    }
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(source) = SourceFile::from_path(entry.path())? {
            sources.push(source);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::cmd_build::Config;

    fn test_env(root: &Path) -> Env {
        Env {
            root: root.to_path_buf(),
            build_root: root.join("build"),
            ninja: PathBuf::from("/usr/bin/ninja"),
            cxx: PathBuf::from("/usr/bin/g++"),
            cc: PathBuf::from("/usr/bin/gcc"),
            ar: PathBuf::from("/usr/bin/ar"),
        }
    }

    fn write_project(root: &Path, frontend: &str, lib_output: &str) -> PathBuf {
        fs::create_dir_all(root.join("app")).unwrap();
        fs::create_dir_all(root.join("libproject")).unwrap();
        fs::write(root.join("app").join("main.cpp"), "int main() {}\n").unwrap();
        fs::write(root.join("libproject").join("add.cpp"), "\n").unwrap();
        fs::write(root.join("libproject").join("subtract.cpp"), "\n").unwrap();
        fs::write(root.join("libproject").join("project.h"), "\n").unwrap();

        let config_path = root.join("Anvil.toml");
        fs::write(
            &config_path,
            format!(
                r#"
cxx = "g++"
cc = "gcc"
ar = "ar"
frontend = "{}"

flags = ["-g"]
defines = ["DEBUG"]

[[builds]]
name = "libproject"
rule = "dynamiclib"
output = "{}"
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
"#,
                frontend, lib_output
            ),
        )
        .unwrap();
        config_path
    }

    fn generate(root: &Path, config_path: &Path) -> Result<(), Error> {
        let config = Config::from_path(config_path).map_err(Report::from)?;
        let env = test_env(root);
        Generator::new(&env, &config, config_path)
            .run()
            .map_err(Report::from)?;
        Ok(())
    }

    #[test]
    fn generates_gcc_build_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let config_path = write_project(root, "gcc", "libproject.so");

        generate(root, &config_path).unwrap();

        let lib = fs::read_to_string(root.join("build/libproject/build.ninja")).unwrap();
        assert!(lib.contains("-MMD -MP -MF $out.d"));
        assert!(lib.contains("depfile = $out.d"));
        assert!(lib.contains("deps = gcc"));
        assert!(lib.contains("-fPIC -shared -fvisibility=hidden"));
        assert!(lib.contains("-DDEBUG -DSHARED_EXPORT"));

        let app = fs::read_to_string(root.join("build/app/build.ninja")).unwrap();
        assert!(app.contains("-l:libproject.so"));
        // the required library is an implicit input of the link edge
        let lib_artifact = root
            .join("build/libproject/libproject.so")
            .display()
            .to_string();
        assert!(app.contains(&format!("| {}", lib_artifact)));
        assert!(app.contains(&format!("-L{}", root.join("build/libproject").display())));
    }

    #[test]
    fn generates_msvc_build_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let config_path = write_project(root, "msvc", "project.dll");

        generate(root, &config_path).unwrap();

        let lib = fs::read_to_string(root.join("build/libproject/build.ninja")).unwrap();
        assert!(lib.contains("/showIncludes"));
        assert!(lib.contains("deps = msvc"));
        assert!(lib.contains("/link /DLL /out:$out"));
        assert!(lib.contains("/DDEBUG /DSHARED_EXPORT"));

        let app = fs::read_to_string(root.join("build/app/build.ninja")).unwrap();
        // a dll is linked through its import library
        assert!(app.contains("project.lib"));
        assert!(app.contains(&format!(
            "/LIBPATH:{}",
            root.join("build/libproject").display()
        )));
    }

    #[test]
    fn writes_compile_database() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let config_path = write_project(root, "gcc", "libproject.so");

        generate(root, &config_path).unwrap();

        let compdb = fs::read_to_string(root.join("build/compile_commands.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&compdb).unwrap();
        // two library sources plus one app source
        assert_eq!(entries.len(), 3);
        for entry in &entries {
            assert!(entry["arguments"].as_array().unwrap().len() > 3);
            assert!(entry["file"].as_str().unwrap().ends_with(".cpp"));
            assert!(entry["output"].as_str().unwrap().ends_with(".o"));
        }
    }

    #[test]
    fn fails_without_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let config_path = write_project(root, "gcc", "libproject.so");
        fs::remove_file(root.join("app").join("main.cpp")).unwrap();

        assert!(generate(root, &config_path).is_err());
    }
}
