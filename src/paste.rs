// Paste flow: resolve the token once, then for every input build a
// `Paste`, encode it, POST it and print the resulting blob link.
//
// Inputs are handled strictly one after another. The first error ends the
// run; inputs after it are never read or uploaded.

use crate::api::{decode_blob_id, encode_payload, post_paste, HttpClient, Paste};
use crate::config::{Config, TokenSource};
use crate::error::{PasteError, Result};
use crate::token::{resolve_token, CommandRunner};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Display name used when pasting standard input.
pub const STDIN_NAME: &str = "<stdin>";

/// Upload a single paste and return its blob id.
pub fn paste_one(paste: &Paste, endpoint: &str, client: &dyn HttpClient) -> Result<String> {
    let body = encode_payload(paste)?;
    let response = post_paste(client, endpoint, body, &paste.token)?;
    decode_blob_id(&response)
}

/// Link under which a blob can be viewed.
pub fn blob_url(base: &str, blob_id: &str) -> String {
    format!("{}{}", base, blob_id)
}

/// Paste every input named by `config` (or stdin when there are none),
/// writing one link per line to `out`.
pub fn run(
    config: &Config,
    runner: &dyn CommandRunner,
    client: &dyn HttpClient,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let token = match &config.token {
        TokenSource::Token(t) => t.clone(),
        TokenSource::Command(cmd) => resolve_token(cmd, runner)?,
    };
    if token.is_empty() {
        return Err(PasteError::MissingToken);
    }

    if config.files.is_empty() {
        let mut content = Vec::new();
        stdin
            .read_to_end(&mut content)
            .map_err(|source| PasteError::Input { path: PathBuf::from(STDIN_NAME), source })?;
        let paste = Paste { token, name: STDIN_NAME.to_string(), content };
        return upload(config, &paste, client, out);
    }

    for path in &config.files {
        let content = std::fs::read(path)
            .map_err(|source| PasteError::Input { path: path.clone(), source })?;
        let paste = Paste { token: token.clone(), name: display_name(path), content };
        upload(config, &paste, client, out)?;
    }
    Ok(())
}

fn upload(config: &Config, paste: &Paste, client: &dyn HttpClient, out: &mut dyn Write) -> Result<()> {
    debug!("pasting {} ({} bytes)", paste.name, paste.content.len());

    let spinner = spinner(config.progress, &paste.name);
    let result = paste_one(paste, &config.endpoint, client);
    spinner.finish_and_clear();

    let blob_id = result?;
    info!("{} pasted as blob {}", paste.name, blob_id);
    writeln!(out, "{}", blob_url(&config.blob_base, &blob_id)).map_err(PasteError::Output)
}

fn spinner(enabled: bool, name: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Pasting {}...", name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Name a file is pasted under: its last path component.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
