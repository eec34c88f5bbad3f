use buildcommon::prelude::*;

use buildcommon::env::{self, Env, CONFIG_FILE};

use crate::cli::TopLevelOptions;
use crate::cmd_build::Config;
use crate::error::Error;

pub fn run(top: &TopLevelOptions) -> Result<(), Error> {
    let root = env::find_root(&top.dir).change_context(Error::Config)?;
    let config = Config::from_path(root.join(CONFIG_FILE))?;

    match Env::check(&root, &config.cxx, &config.cc, &config.ar) {
        Err(e) => {
            errorln!("Failed", "Error occurred during environment check");

            Err(e.change_context(Error::CheckEnv))
        }
        Ok(None) => {
            errorln!("Failed", "Environment check");
            hintln!("Consider", "Fix the issues above and try again");

            Err(report!(Error::CheckEnv))
        }
        Ok(Some(env)) => {
            infoln!("Success", "Environment check OK");
            env.save();

            Ok(())
        }
    }
}
