//! Native clipboard strategies that pipe the payload into a helper program.
//!
//! Each helper invocation offers a single MIME type. An HTML entry pastes as
//! rich text into mail clients but gives plain-text targets nothing, so the
//! plain-text helpers only act as a fallback tier when no HTML helper works.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use signature::{ClipboardExporter, ClipboardPayload, ClipboardStrategy, CopyError};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Which half of the payload a helper understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Html,
    Plain,
}

/// Clipboard helper invoked as `program args...` with the payload on stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    name: &'static str,
    program: String,
    args: Vec<String>,
    flavor: Flavor,
}

impl CommandClipboard {
    pub fn new(name: &'static str, program: impl Into<String>, flavor: Flavor) -> Self {
        Self {
            name,
            program: program.into(),
            args: Vec::new(),
            flavor,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Wayland, rich text.
    pub fn wl_copy() -> Self {
        Self::new("wl-copy", "wl-copy", Flavor::Html).arg("--type").arg("text/html")
    }

    /// X11, rich text.
    pub fn xclip() -> Self {
        Self::new("xclip", "xclip", Flavor::Html)
            .arg("-selection")
            .arg("clipboard")
            .arg("-t")
            .arg("text/html")
    }

    /// Wayland, plain text.
    pub fn wl_copy_text() -> Self {
        Self::new("wl-copy-text", "wl-copy", Flavor::Plain).arg("--type").arg("text/plain")
    }

    /// X11, plain text.
    pub fn xclip_text() -> Self {
        Self::new("xclip-text", "xclip", Flavor::Plain)
            .arg("-selection")
            .arg("clipboard")
    }

    /// macOS, plain text only.
    pub fn pbcopy() -> Self {
        Self::new("pbcopy", "pbcopy", Flavor::Plain)
    }

    async fn pipe(&self, input: &str) -> Result<(), CopyError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => CopyError::NotAvailable,
                _ => CopyError::CommandFailed(err.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|err| CopyError::CommandFailed(err.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|err| CopyError::CommandFailed(err.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(CopyError::CommandFailed(format!("{} exited with {status}", self.program)))
        }
    }
}

#[async_trait(?Send)]
impl ClipboardStrategy for CommandClipboard {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn write(&self, payload: &ClipboardPayload) -> Result<(), CopyError> {
        match self.flavor {
            Flavor::Html => self.pipe(&payload.html).await,
            Flavor::Plain => self.pipe(&payload.plain).await,
        }
    }
}

/// Helpers for the current platform: single-format HTML helpers first, then
/// the plain-text tier.
pub fn native_exporter() -> ClipboardExporter {
    if cfg!(target_os = "macos") {
        ClipboardExporter::new().with_strategy(CommandClipboard::pbcopy())
    } else {
        ClipboardExporter::new()
            .with_strategy(CommandClipboard::wl_copy())
            .with_strategy(CommandClipboard::xclip())
            .with_strategy(CommandClipboard::wl_copy_text())
            .with_strategy(CommandClipboard::xclip_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn plain_text_tier_follows_html_helpers() {
        assert_eq!(
            native_exporter().strategy_names(),
            vec!["wl-copy", "xclip", "wl-copy-text", "xclip-text"]
        );
        assert_eq!(CommandClipboard::xclip_text().flavor, Flavor::Plain);
        assert!(!CommandClipboard::xclip_text().args.iter().any(|a| a == "text/html"));
    }

    #[tokio::test]
    async fn missing_program_is_not_available() {
        let strategy = CommandClipboard::new("missing", "definitely-not-a-clipboard-helper", Flavor::Plain);
        let result = strategy.write(&ClipboardPayload::new("<b>x</b>", "x")).await;
        assert_eq!(result, Err(CopyError::NotAvailable));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn payload_goes_to_stdin() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("clip.html");
        let strategy = CommandClipboard::new("sh", "sh", Flavor::Html)
            .arg("-c")
            .arg(format!("cat > '{}'", out.display()));

        strategy
            .write(&ClipboardPayload::new("<b>Ada</b>", "Ada"))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "<b>Ada</b>");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_program_reports_command_failed() {
        let strategy = CommandClipboard::new("false", "false", Flavor::Plain);
        let result = strategy.write(&ClipboardPayload::new("", "")).await;
        assert!(matches!(result, Err(CopyError::CommandFailed(_))));
    }
}
