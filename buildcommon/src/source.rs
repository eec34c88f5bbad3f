//! Utilities for detecting and processing source file types
use rustc_hash::FxHasher;

use crate::prelude::*;

use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::system::Error;

/// Source file types
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum SourceType {
    /// C source file
    C,
    /// C++ source file
    Cpp,
}

impl SourceType {
    /// Get source type from file extension
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "c" => Some(Self::C),
            "cpp" | "cc" | "cxx" | "c++" => Some(Self::Cpp),
            _ => None,
        }
    }
}

pub struct SourceFile {
    /// Type of the source file (used to determine which build rule to run)
    pub typ: SourceType,

    /// Full path of the source file
    pub path: String,

    /// Name of the object file produced in the format of `{base}-{hash}{ext}`.
    ///
    /// By adding .o to this name, we can get the object file.
    pub name_hash: String,
}

impl SourceFile {
    /// Create source file property from path. Path should be full (absolute) path
    ///
    /// Return None if the file is not a source file
    pub fn from_path(source: &Path) -> Result<Option<Self>, Error> {
        let path = source.to_utf8()?;

        // find extension without dot and get source type
        let dot = match path.rfind('.') {
            Some(dot) => dot,
            None => return Ok(None),
        };
        let ext = &path[dot + 1..];
        let typ = match SourceType::from_ext(ext) {
            Some(typ) => typ,
            None => return Ok(None),
        };

        // get the base name of file
        let slash = path.rfind(|c| c == '/' || c == '\\').unwrap_or(0);
        let base = &path[slash + 1..dot];
        if base.is_empty() {
            return Ok(None);
        }

        // hash the full path, so the same base name in two source
        // directories cannot collide in the object directory
        let mut hasher = FxHasher::default();
        source.hash(&mut hasher);
        let hash = hasher.finish();

        let object_name = format!("{}-{:016x}.{}", base, hash, ext);

        Ok(Some(Self {
            typ,
            path,
            name_hash: object_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_extensions() {
        assert_eq!(SourceType::from_ext("c"), Some(SourceType::C));
        assert_eq!(SourceType::from_ext("cpp"), Some(SourceType::Cpp));
        assert_eq!(SourceType::from_ext("cc"), Some(SourceType::Cpp));
        assert_eq!(SourceType::from_ext("cxx"), Some(SourceType::Cpp));
        assert_eq!(SourceType::from_ext("h"), None);
        assert_eq!(SourceType::from_ext(""), None);
    }

    #[test]
    fn skips_non_sources() {
        let file = SourceFile::from_path(Path::new("/proj/src/readme.md")).unwrap();
        assert!(file.is_none());
        let file = SourceFile::from_path(Path::new("/proj/src/Makefile")).unwrap();
        assert!(file.is_none());
        // extension only, no base name
        let file = SourceFile::from_path(Path::new("/proj/src/.cpp")).unwrap();
        assert!(file.is_none());
    }

    #[test]
    fn object_names_do_not_collide() {
        let a = SourceFile::from_path(Path::new("/proj/a/add.cpp"))
            .unwrap()
            .unwrap();
        let b = SourceFile::from_path(Path::new("/proj/b/add.cpp"))
            .unwrap()
            .unwrap();
        assert_eq!(a.typ, SourceType::Cpp);
        assert!(a.name_hash.starts_with("add-"));
        assert_ne!(a.name_hash, b.name_hash);
    }
}
