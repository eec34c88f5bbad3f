//! Compiler flag assembly
//!
//! Renders config values into the argument spellings of the selected
//! compiler frontend (gcc-style or msvc-style).

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Compiler frontend families understood by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frontend {
    Gcc,
    Msvc,
}

impl Frontend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Msvc => "msvc",
        }
    }
}

/// Flags resolved from configuration, rendered for one frontend
#[derive(Debug, Clone, PartialEq)]
pub struct Flags {
    pub frontend: Frontend,

    /// Rendered define flags (`-DX` / `/DX`)
    pub defines: Vec<String>,

    /// Raw flags, passed through as the user wrote them
    pub flags: Vec<String>,

    /// Rendered include flags (`-Ipath` / `/Ipath`)
    pub includes: Vec<String>,

    /// Rendered linker arguments (library paths and libraries)
    pub linkargs: Vec<String>,
}

impl Flags {
    pub fn new(frontend: Frontend, flags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            frontend,
            defines: Vec::new(),
            flags: flags.into_iter().map(|x| x.into()).collect(),
            includes: Vec::new(),
            linkargs: Vec::new(),
        }
    }

    /// Add define flags (`-D<name>` / `/D<name>`)
    pub fn add_defines(&mut self, defines: impl IntoIterator<Item = impl Display>) {
        let prefix = match self.frontend {
            Frontend::Gcc => "-D",
            Frontend::Msvc => "/D",
        };
        self.defines
            .extend(defines.into_iter().map(|x| format!("{}{}", prefix, x)));
    }

    /// Add include flags (`-I<path>` / `/I<path>`)
    pub fn add_includes(&mut self, includes: impl IntoIterator<Item = impl Display>) {
        let prefix = match self.frontend {
            Frontend::Gcc => "-I",
            Frontend::Msvc => "/I",
        };
        self.includes
            .extend(includes.into_iter().map(|x| format!("{}{}", prefix, x)));
    }

    /// Add library paths (`-L<path>` / `/LIBPATH:<path>`) for the linker
    pub fn add_libpaths(&mut self, paths: impl IntoIterator<Item = impl Display>) {
        let prefix = match self.frontend {
            Frontend::Gcc => "-L",
            Frontend::Msvc => "/LIBPATH:",
        };
        self.linkargs
            .extend(paths.into_iter().map(|x| format!("{}{}", prefix, x)));
    }

    /// Add libraries for the linker
    ///
    /// Library names are exact file names. The gcc frontend links them
    /// with `-l:<name>`; the msvc frontend passes them through, with
    /// `.dll` names replaced by their companion import library
    pub fn add_libraries(&mut self, libs: impl IntoIterator<Item = impl AsRef<str>>) {
        for lib in libs {
            let lib = lib.as_ref();
            let arg = match self.frontend {
                Frontend::Gcc => format!("-l:{}", lib),
                Frontend::Msvc => import_library(lib),
            };
            self.linkargs.push(arg);
        }
    }
}

/// On the msvc frontend a `.dll` is linked through its companion
/// import library
pub fn import_library(name: &str) -> String {
    match name.strip_suffix(".dll") {
        Some(base) => format!("{}.lib", base),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcc_spelling() {
        let mut flags = Flags::new(Frontend::Gcc, ["-std=c++17"]);
        flags.add_defines(["DEBUG"]);
        flags.add_includes(["include"]);
        flags.add_libpaths(["libs"]);
        flags.add_libraries(["libproject.so"]);

        assert_eq!(flags.defines, ["-DDEBUG"]);
        assert_eq!(flags.includes, ["-Iinclude"]);
        assert_eq!(flags.linkargs, ["-Llibs", "-l:libproject.so"]);
    }

    #[test]
    fn msvc_spelling() {
        let mut flags = Flags::new(Frontend::Msvc, ["/std:c++17"]);
        flags.add_defines(["DEBUG"]);
        flags.add_includes(["include"]);
        flags.add_libpaths(["libs"]);
        flags.add_libraries(["project.dll", "other.lib"]);

        assert_eq!(flags.defines, ["/DDEBUG"]);
        assert_eq!(flags.includes, ["/Iinclude"]);
        assert_eq!(
            flags.linkargs,
            ["/LIBPATH:libs", "project.lib", "other.lib"]
        );
    }

    #[test]
    fn dll_links_through_import_library() {
        assert_eq!(import_library("project.dll"), "project.lib");
        assert_eq!(import_library("project.lib"), "project.lib");
        assert_eq!(import_library("libproject.so"), "libproject.so");
    }
}
