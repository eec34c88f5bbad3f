use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use buildcommon::prelude::*;

use buildcommon::env::{self, Env, CONFIG_FILE};
use buildcommon::system::Command;
use clap::Args;
use derive_more::derive::Deref;
use rustc_hash::FxHashSet;

use crate::cli::{CommonOptions, TopLevelOptions};
use crate::error::Error;

mod config;
mod generate;
mod validate;

pub use config::{Build, BuildRule, Config};

use generate::Generator;

/// CLI Options for the build command
#[derive(Debug, Clone, PartialEq, Args, Deref)]
pub struct Options {
    /// Build only the named build (and what it requires)
    ///
    /// All builds are built by default
    pub name: Option<String>,

    /// Only generate ninja files and the compile database
    /// (compile_commands.json), without running ninja
    #[clap(short = 'c', long)]
    pub compdb: bool,

    /// Common options
    #[deref]
    #[clap(flatten)]
    pub options: CommonOptions,
}

pub fn run(top: &TopLevelOptions, options: &Options) -> Result<(), Error> {
    let start_time = Instant::now();

    let root = env::find_root(&top.dir).change_context(Error::Config)?;
    let config_path = root.join(CONFIG_FILE);
    let config = Config::from_path(&config_path)?;
    validate::run(&config)?;

    let env = Env::load(&root, &config.cxx, &config.cc, &config.ar)
        .change_context(Error::Config)?;

    let selected = build_order(&config, options.name.as_deref())?;

    Generator::new(&env, &config, &config_path).run()?;

    if options.compdb {
        infoln!(
            "Finished",
            "compile_commands.json in {:.2}s",
            start_time.elapsed().as_secs_f32()
        );
        return Ok(());
    }

    for name in &selected {
        run_ninja(&env, name)?;
    }

    let elapsed = start_time.elapsed();
    infoln!(
        "Finished",
        "{} build{} in {:.2}s",
        selected.len(),
        if selected.len() == 1 { "" } else { "s" },
        elapsed.as_secs_f32()
    );

    Ok(())
}

/// Resolve which builds to run, requirements first
fn build_order<'a>(config: &'a Config, name: Option<&'a str>) -> Result<Vec<&'a str>, Error> {
    let mut order = Vec::with_capacity(config.builds.len());
    let mut done = FxHashSet::default();

    match name {
        Some(name) => {
            if config.find_build(name).is_none() {
                errorln!("Error", "no build named `{}`", name);
                hintln!("Consider", "Check the [[builds]] entries in Anvil.toml");
                return Err(report!(Error::UnknownBuild(name.to_string())));
            }
            visit(config, name, &mut done, &mut order);
        }
        None => {
            for build in &config.builds {
                visit(config, &build.name, &mut done, &mut order);
            }
        }
    }

    Ok(order)
}

/// Depth-first over `requires`. Validation already rejected unknown
/// names and cycles
fn visit<'a>(
    config: &'a Config,
    name: &'a str,
    done: &mut FxHashSet<&'a str>,
    order: &mut Vec<&'a str>,
) {
    if !done.insert(name) {
        return;
    }
    if let Some(build) = config.find_build(name) {
        for req in &build.requires {
            visit(config, req, done, order);
        }
    }
    order.push(name);
}

error_context!(RunNinja, |r| -> Error {
    errorln!("Failed", "Running ninja");
    r.change_context(Error::Ninja)
});

fn run_ninja(env: &Env, name: &str) -> ResultIn<(), RunNinja> {
    infoln!("Building", "{}", name);
    let build_dir = env.build_dir(name);

    let mut child = Command::new(&env.ninja)
        .args(args!["-C", build_dir])
        .piped()
        .spawn()?;

    let root = env.root.clone();
    let handle = child.take_stdout().map(|stdout| {
        std::thread::spawn(move || {
            for line in stdout.lines().map_while(|r| r.ok()) {
                // pretty print ninja progress
                let i = match line.find(']') {
                    Some(i) => i,
                    None => continue,
                };

                let line = line[i + 1..].trim_start();

                let s = match line.find(' ') {
                    Some(s) => s,
                    None => continue,
                };

                let status = &line[..s];
                let path = Path::new(&line[s + 1..]);
                if path.is_absolute() {
                    infoln!(status, "{}", path.rebase(&root).display());
                } else {
                    infoln!(status, "{}", path.display());
                }
            }
        })
    });

    let mut child = child.wait()?;
    let _ = handle.map(|h| h.join());
    let result = child.check();
    if result.is_err() {
        child.dump_stderr("Error");
    }
    result?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(builds: &str) -> Config {
        let toml = format!(
            r#"
cxx = "g++"
cc = "gcc"
ar = "ar"
frontend = "gcc"
{}
"#,
            builds
        );
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn orders_requirements_first() {
        let config = config(
            r#"
[[builds]]
name = "app"
rule = "exe"
output = "app"
requires = ["lib"]
sources = ["app"]

[[builds]]
name = "lib"
rule = "staticlib"
output = "libproject.a"
sources = ["lib"]
"#,
        );

        let order = build_order(&config, None).unwrap();
        assert_eq!(order, ["lib", "app"]);

        let order = build_order(&config, Some("app")).unwrap();
        assert_eq!(order, ["lib", "app"]);

        let order = build_order(&config, Some("lib")).unwrap();
        assert_eq!(order, ["lib"]);
    }

    #[test]
    fn shared_requirement_is_built_once() {
        let config = config(
            r#"
[[builds]]
name = "lib"
rule = "staticlib"
output = "libproject.a"
sources = ["lib"]

[[builds]]
name = "app1"
rule = "exe"
output = "app1"
requires = ["lib"]
sources = ["app1"]

[[builds]]
name = "app2"
rule = "exe"
output = "app2"
requires = ["lib"]
sources = ["app2"]
"#,
        );

        let order = build_order(&config, None).unwrap();
        assert_eq!(order, ["lib", "app1", "app2"]);
    }

    #[test]
    fn unknown_build_is_an_error() {
        let config = config(
            r#"
[[builds]]
name = "app"
rule = "exe"
output = "app"
sources = ["app"]
"#,
        );
        assert!(build_order(&config, Some("nope")).is_err());
    }
}
