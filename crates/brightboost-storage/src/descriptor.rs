//! Module descriptor status line

use crate::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// `module.prop` whose last line is owned by the daemon
#[derive(Debug, Clone)]
pub struct StatusDescriptor {
    path: PathBuf,
}

impl StatusDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the last line with `description=<status>`, keeping every
    /// other line byte for byte.
    pub fn update(&self, status: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Err(StorageError::DescriptorNotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path)?;
        fs::write(&self.path, replace_last_line(&contents, status))?;
        Ok(())
    }
}

fn replace_last_line(contents: &str, status: &str) -> String {
    let mut lines: Vec<&str> = contents.split_inclusive('\n').collect();
    lines.pop();

    let mut out = lines.concat();
    out.push_str("description=");
    out.push_str(status);
    out
}
