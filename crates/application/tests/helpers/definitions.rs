#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes YAML definition files into a temporary directory.
pub struct DefinitionFiles {
    dir: TempDir,
}

impl DefinitionFiles {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
