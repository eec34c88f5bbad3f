//! compile_commands.json generation
use crate::prelude::*;

use std::path::Path;

use derive_more::derive::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

/// The compile database in the format clangd and friends expect
#[derive(Debug, Default, Serialize, Deserialize, Deref, DerefMut)]
pub struct CompileDb(Vec<CompileCommand>);

/// One entry of compile_commands.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileCommand {
    /// Working directory of the compilation
    pub directory: String,
    /// The full compiler invocation, one argument per element
    pub arguments: Vec<String>,
    /// The source file
    pub file: String,
    /// The object file
    pub output: String,
}

impl CompileDb {
    /// Save compile_commands.json. Failure to save is logged, not fatal:
    /// the build itself does not depend on the compile database
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        verboseln!("saving '{}'", path.display());
        let file = match system::buf_writer(path) {
            Ok(file) => file,
            Err(e) => {
                errorln!(
                    "Error",
                    "Failed to save compile_commands.json: failed to open file: {}",
                    e
                );
                return;
            }
        };
        if let Err(e) = serde_json::to_writer_pretty(file, self) {
            errorln!("Error", "Failed to save compile_commands.json: {}", e);
        }
    }
}
