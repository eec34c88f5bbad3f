use buildcommon::prelude::*;

use buildcommon::env;
use clap::Args;
use derive_more::derive::Deref;

use crate::cli::{CommonOptions, TopLevelOptions};
use crate::error::Error;

/// CLI Options for the clean command
#[derive(Debug, Clone, PartialEq, Args, Deref)]
pub struct Options {
    /// Only clean the named build
    ///
    /// All builds are cleaned by default
    pub name: Option<String>,

    /// Common options
    #[deref]
    #[clap(flatten)]
    pub options: CommonOptions,
}

pub fn run(top: &TopLevelOptions, clean: &Options) -> Result<(), Error> {
    let root = env::find_root(&top.dir).change_context(Error::Config)?;
    let target = root.join("build");
    let output = match &clean.name {
        Some(name) => target.into_joined(name),
        None => target,
    };

    match system::remove_directory(&output) {
        Ok(_) => {
            infoln!("Cleaned", "{}", output.rebase(&root).display());
            Ok(())
        }
        Err(e) => {
            errorln!(
                "Failed",
                "Cannot remove '{}'",
                output.rebase(&root).display()
            );
            Err(e).change_context(Error::Clean)
        }
    }
}
