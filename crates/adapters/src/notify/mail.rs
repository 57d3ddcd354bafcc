// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail transport that hands messages to the local mailer binary.

use async_trait::async_trait;
use sluice_core::{Notice, Notifier, NotifyError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Attachment extensions the mail transport accepts.
const SUPPORTED_ATTACHMENTS: &[&str] = &["pdf", "doc", "csv", "txt", "log"];

/// Mail transport invoking `mail -s <subject> [-A <attachment>] <recipients>`
/// with the body on stdin.
#[derive(Debug, Clone)]
pub struct SendmailNotifier {
    mailer: PathBuf,
}

impl Default for SendmailNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SendmailNotifier {
    pub fn new() -> Self {
        Self {
            mailer: PathBuf::from("mail"),
        }
    }

    /// Override the mailer binary (used by tests)
    pub fn with_mailer(mut self, mailer: impl Into<PathBuf>) -> Self {
        self.mailer = mailer.into();
        self
    }

    fn check_attachment(path: &Path) -> Result<(), NotifyError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_ATTACHMENTS.contains(&extension.as_str()) {
            return Err(NotifyError::UnsupportedAttachment(
                path.to_string_lossy().to_string(),
            ));
        }
        if !path.exists() {
            return Err(NotifyError::AttachmentMissing(path.to_path_buf()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for SendmailNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        if notice.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        if let Some(attachment) = &notice.attachment {
            Self::check_attachment(attachment)?;
        }

        let mut command = Command::new(&self.mailer);
        command.arg("-s").arg(&notice.subject);
        if let Some(attachment) = &notice.attachment {
            command.arg("-A").arg(attachment);
        }
        command.args(&notice.recipients);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .map_err(|e| NotifyError::Delivery(format!("failed to start mailer: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A mailer that rejects the invocation may exit before reading
            // stdin; the exit status below reports that case.
            if let Err(e) = stdin.write_all(notice.body.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(NotifyError::Io(e));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NotifyError::Delivery(stderr.trim().to_string()));
        }

        tracing::info!(
            recipients = notice.recipients.len(),
            subject = %notice.subject,
            "mail notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
