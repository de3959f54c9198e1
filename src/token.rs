// Token resolution: runs a user supplied command line (for example
// `pass show sourcehut`) and uses whatever it prints on stdout as the
// personal access token.
//
// Process spawning goes through the `CommandRunner` trait so the
// orchestration can be tested without starting real processes.

use crate::error::{PasteError, Result};
use log::debug;
use std::process::{Command, Stdio};

/// Runs an already split argv and hands back its captured stdout.
pub trait CommandRunner {
    fn capture_stdout(&self, argv: &[String]) -> Result<Vec<u8>>;
}

/// Spawns real processes. Stderr goes straight to our own stderr so that
/// prompts and diagnostics from e.g. gpg stay visible; stdin is closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture_stdout(&self, argv: &[String]) -> Result<Vec<u8>> {
        let (program, args) = argv.split_first().ok_or(PasteError::EmptyCommand)?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| PasteError::Process(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            return Err(PasteError::Process(format!("{}: {}", program, output.status)));
        }
        Ok(output.stdout)
    }
}

/// Split `command_line` with shell quoting rules, run it and return its
/// stdout as the token.
///
/// The output is returned exactly as printed, trailing newline included.
pub fn resolve_token(command_line: &str, runner: &dyn CommandRunner) -> Result<String> {
    if command_line.is_empty() {
        return Err(PasteError::EmptyCommand);
    }
    let argv = shell_words::split(command_line)
        .map_err(|e| PasteError::CommandParse(e.to_string()))?;
    if argv.is_empty() {
        return Err(PasteError::EmptyCommand);
    }

    debug!("resolving token by running {:?}", argv[0]);
    let stdout = runner.capture_stdout(&argv)?;
    String::from_utf8(stdout)
        .map_err(|_| PasteError::Process(format!("{}: output is not valid UTF-8", argv[0])))
}
