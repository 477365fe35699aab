//! services/api/src/adapters/clipboard.rs
//!
//! This module contains the adapter for the host's clipboard.
//! It implements the `ClipboardService` port by piping text into the platform's
//! clipboard tool.

use async_trait::async_trait;
use genui_core::ports::{ClipboardService, PortError, PortResult};
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Tools tried in order when no command is configured.
const DEFAULT_COMMANDS: &[&[&str]] = &[
    &["pbcopy"],
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
    &["clip"],
];

/// An adapter that implements `ClipboardService` with a clipboard command-line tool.
#[derive(Clone, Debug)]
pub struct SystemClipboardAdapter {
    commands: Vec<Vec<String>>,
}

impl SystemClipboardAdapter {
    /// Uses `command` (split on whitespace) if given, otherwise the platform defaults.
    pub fn new(command: Option<&str>) -> Self {
        let commands = match command {
            Some(command) => vec![command.split_whitespace().map(str::to_string).collect()],
            None => DEFAULT_COMMANDS
                .iter()
                .map(|argv| argv.iter().map(|s| s.to_string()).collect())
                .collect(),
        };
        Self { commands }
    }

    async fn run(argv: &[String], text: &str) -> std::io::Result<()> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "empty command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Dropping stdin closes the pipe so the tool can finish.
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::new(
                ErrorKind::PermissionDenied,
                format!("{} exited with {}", program, status),
            ))
        }
    }
}

#[async_trait]
impl ClipboardService for SystemClipboardAdapter {
    async fn write_text(&self, text: &str) -> PortResult<()> {
        let mut last_failure = None;

        for argv in &self.commands {
            match Self::run(argv, text).await {
                Ok(()) => {
                    debug!(tool = %argv.join(" "), "Clipboard written");
                    return Ok(());
                }
                // Tool not installed: try the next one.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => last_failure = Some(e.to_string()),
            }
        }

        Err(PortError::Unavailable(last_failure.unwrap_or_else(|| {
            "no clipboard tool is available on this host".to_string()
        })))
    }
}
