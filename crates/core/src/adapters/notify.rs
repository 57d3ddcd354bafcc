// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification transport contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// A notification to dispatch through a transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub subject: String,
    pub body: String,
    /// Mail recipients, for transports that address mailboxes
    pub recipients: Vec<String>,
    /// Chat channel, for transports that address channels
    pub channel: Option<String>,
    /// Optional file attachment (mail transports)
    pub attachment: Option<PathBuf>,
}

impl Notice {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipients: Vec::new(),
            channel: None,
            attachment: None,
        }
    }

    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachment = Some(path.into());
        self
    }
}

/// Errors from notification transports
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notice has no recipients")]
    NoRecipients,
    #[error("notice has no channel")]
    NoChannel,
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("no webhook configured for channel: {0}")]
    NoWebhook(String),
    #[error("unsupported attachment type: {0}")]
    UnsupportedAttachment(String),
    #[error("attachment not found: {}", .0.display())]
    AttachmentMissing(PathBuf),
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Adapter trait for notification delivery
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Dispatch a notice
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}
