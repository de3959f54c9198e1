// Run configuration. Built by the CLI from its flags and handed to
// `paste::run`, so the library never reads process-global state.

use crate::api::DEFAULT_ENDPOINT;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of every printed paste link; the blob id is appended.
pub const DEFAULT_BLOB_BASE: &str = "https://paste.sr.ht/blob/";

/// How the personal access token is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Given directly on the command line or in the environment.
    Token(String),
    /// A command line whose stdout is the token.
    Command(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: TokenSource,
    /// Files to paste, one paste each. Empty means standard input.
    pub files: Vec<PathBuf>,
    pub endpoint: String,
    pub blob_base: String,
    pub timeout: Option<Duration>,
    /// Show a spinner on stderr while uploading.
    pub progress: bool,
}

impl Config {
    /// Defaults for everything but the token source.
    pub fn new(token: TokenSource) -> Self {
        Config {
            token,
            files: Vec::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            blob_base: DEFAULT_BLOB_BASE.to_string(),
            timeout: None,
            progress: false,
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }
}
