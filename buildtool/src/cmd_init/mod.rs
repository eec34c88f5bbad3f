use buildcommon::prelude::*;

use std::path::Path;

use buildcommon::env::CONFIG_FILE;
use clap::Args;
use derive_more::derive::Deref;

use crate::cli::CommonOptions;
use crate::error::Error;

/// CLI Options for the init command
#[derive(Debug, Clone, PartialEq, Args, Deref)]
pub struct Options {
    /// Path to create the project in
    pub path: String,

    /// Common options
    #[deref]
    #[clap(flatten)]
    pub options: CommonOptions,
}

macro_rules! init_file {
    ($file:literal, $target:ident) => {{
        let content = include_str!(concat!("template/", $file));
        let target_path = $target.join($file);
        system::write_file(&target_path, content).change_context(Error::InitFile($file))
    }};
}

pub fn run(options: &Options) -> Result<(), Error> {
    let path = Path::new(&options.path);
    if path.exists() {
        if path.is_file() {
            errorln!("Failed", "Path is a file: {}", path.display());
            return Err(report!(Error::AlreadyExists));
        }
        let mut dir = std::fs::read_dir(path).change_context(Error::AlreadyExists)?;
        if dir.next().is_some() {
            errorln!("Failed", "Path is not empty: {}", path.display());
            return Err(report!(Error::AlreadyExists));
        }
    } else {
        system::ensure_directory(path).change_context(Error::InitDir)?;
        infoln!("Created", "{}", path.display());
    }

    let path = path.to_abs().change_context(Error::InitDir)?;

    // Anvil.toml
    let name = path
        .file_name()
        .ok_or(Error::InitDir)
        .attach_printable("cannot init in a root directory")?;
    let name = sanitize_name(&name.to_string_lossy());

    let config = include_str!("template/Anvil.toml").replace("NAMEPLACEHOLDER", &name);
    system::write_file(path.join(CONFIG_FILE), config)
        .change_context(Error::InitFile("Anvil.toml"))?;

    system::ensure_directory(path.join("app")).change_context(Error::InitDir)?;
    system::ensure_directory(path.join("libproject")).change_context(Error::InitDir)?;

    init_file!("app/main.cpp", path)?;
    init_file!("libproject/project.h", path)?;
    init_file!("libproject/add.cpp", path)?;
    init_file!("libproject/subtract.cpp", path)?;
    init_file!(".gitignore", path)?;

    infoln!("Initialized", "empty project `{}`", name);

    Ok(())
}

/// Build names may only contain letters, digits, `_` and `-`
fn sanitize_name(name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if name.is_empty() {
        "project".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cmd_build::Config;

    fn options(path: &Path) -> Options {
        Options {
            path: path.display().to_string(),
            options: CommonOptions {
                verbose: false,
                trace: false,
                color: None,
            },
        }
    }

    #[test]
    fn creates_template_project() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("demo");
        run(&options(&dir)).unwrap();

        assert!(dir.join("Anvil.toml").is_file());
        assert!(dir.join("app/main.cpp").is_file());
        assert!(dir.join("libproject/project.h").is_file());
        assert!(dir.join("libproject/add.cpp").is_file());
        assert!(dir.join("libproject/subtract.cpp").is_file());
        assert!(dir.join(".gitignore").is_file());

        // the template must load as a valid config
        let config = Config::from_path(dir.join("Anvil.toml"))
            .map_err(Report::from)
            .unwrap();
        assert!(config.find_build("libproject").is_some());
        let app = config.find_build("demo").unwrap();
        assert_eq!(app.requires, ["libproject"]);
    }

    #[test]
    fn refuses_nonempty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("somefile"), "x").unwrap();
        assert!(run(&options(tmp.path())).is_err());
    }

    #[test]
    fn sanitizes_project_names() {
        assert_eq!(sanitize_name("demo"), "demo");
        assert_eq!(sanitize_name("my app"), "my-app");
        assert_eq!(sanitize_name("v1.2"), "v1-2");
        assert_eq!(sanitize_name(""), "project");
    }
}
