// Library root
// ------------
// `spaste` pastes files or standard input to paste.sr.ht. The binary
// (`main.rs`) only parses flags and wires the real implementations in.
//
// Module responsibilities:
// - `api`: JSON shapes of the paste API and the HTTP round trip.
// - `token`: obtaining the token from an external command.
// - `paste`: the per-input flow that ties the two together.
// - `config` / `cli`: run configuration and the flags that produce it.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod paste;
pub mod token;

pub use api::{HttpClient, Paste, ReqwestClient};
pub use config::{Config, TokenSource};
pub use error::{PasteError, Result};
pub use token::{CommandRunner, SystemRunner};
