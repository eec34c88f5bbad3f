#[derive(Debug, thiserror::Error)]
pub enum Error {
    // init
    #[error("failed to create project directory")]
    InitDir,
    #[error("failed to create {0}")]
    InitFile(&'static str),
    #[error("path already exists and is not an empty directory")]
    AlreadyExists,

    // checkenv
    #[error("environment check failed")]
    CheckEnv,

    // clean
    #[error("failed to clean")]
    Clean,

    // build:config
    #[error("failed to load project config")]
    Config,
    #[error("project config is invalid")]
    Validate,
    #[error("no build named `{0}`")]
    UnknownBuild(String),

    // build:generate
    #[error("no source files found")]
    NoSources,
    #[error("failed to generate ninja files")]
    Generate,

    // build:ninja
    #[error("failed to run ninja")]
    Ninja,
}

impl buildcommon::system::Context for Error {}
