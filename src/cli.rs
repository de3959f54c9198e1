// Command-line surface: `spaste (-e COMMAND | -t TOKEN) [FILE...]`.
// Parsing lives here; everything it produces is folded into a `Config`.

use crate::api::DEFAULT_ENDPOINT;
use crate::config::{Config, TokenSource, DEFAULT_BLOB_BASE};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "spaste",
    version,
    about = "Paste files or standard input to paste.sr.ht",
    long_about = "Uploads each FILE (or standard input when none is given) as an unlisted \
                  paste on paste.sr.ht and prints one blob link per paste."
)]
#[command(group(ArgGroup::new("auth").required(true).args(["exec", "token"])))]
pub struct Cli {
    /// Run COMMAND and use its standard output as the token
    #[arg(short = 'e', long = "exec", value_name = "COMMAND", value_parser = NonEmptyStringValueParser::new())]
    pub exec: Option<String>,

    /// sourcehut personal access token
    #[arg(short = 't', long, value_name = "TOKEN", value_parser = NonEmptyStringValueParser::new())]
    pub token: Option<String>,

    /// API endpoint pastes are created at
    #[arg(long, env = "SPASTE_ENDPOINT", default_value = DEFAULT_ENDPOINT, value_name = "URL")]
    pub endpoint: String,

    /// Give up on a request after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Do not show a spinner while uploading
    #[arg(short, long)]
    pub quiet: bool,

    /// Files to paste, one paste each; standard input when omitted
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> Config {
        // The "auth" group guarantees exactly one of the two is set.
        let token = match (self.exec, self.token) {
            (Some(cmd), _) => TokenSource::Command(cmd),
            (None, token) => TokenSource::Token(token.unwrap_or_default()),
        };
        Config {
            token,
            files: self.files,
            endpoint: self.endpoint,
            blob_base: DEFAULT_BLOB_BASE.to_string(),
            timeout: self.timeout.map(Duration::from_secs),
            progress: !self.quiet,
        }
    }
}
