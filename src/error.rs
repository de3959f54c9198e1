// Error type shared by every stage of a paste: token resolution, payload
// encoding, the HTTP round trip and response decoding. The binary turns
// these into `anyhow::Error` at the top level.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while pasting one or more inputs.
#[derive(Error, Debug)]
pub enum PasteError {
    #[error("token command is empty")]
    EmptyCommand,

    #[error("cannot parse token command: {0}")]
    CommandParse(String),

    #[error("token command failed: {0}")]
    Process(String),

    #[error("missing token argument")]
    MissingToken,

    #[error("{}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding paste payload: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("paste.sr.ht rejected the paste ({status}): {body}")]
    ServerRejected { status: u16, body: String },

    #[error("decoding paste response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unknown response scheme: {0}")]
    UnknownScheme(String),

    #[error("writing output: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PasteError>;
