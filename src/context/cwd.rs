//! Current working directory capture.

use std::env;
use std::io;

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct CurrentDir {
    pub path: String,
}

impl CurrentDir {
    /// Capture the current working directory of the process.
    pub fn capture() -> io::Result<Self> {
        let path = env::current_dir()?.to_string_lossy().to_string();
        Ok(Self { path })
    }
}
