//! Runtime abstraction for system operations.
//!
//! Environment lookups, the temporary directory and the staged package files
//! go through the [`Runtime`] trait so credential resolution and the mirror
//! pipeline can be tested without touching the real process environment or
//! file system.

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Directory where downloaded packages are staged before upload.
    fn temp_dir(&self) -> PathBuf;

    // File system
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir_impl()
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.read_impl(path)
    }
}
