// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat transport posting to per-channel webhooks.
//!
//! Channels resolve through a static channel -> webhook map supplied by the
//! run configuration.

use async_trait::async_trait;
use sluice_core::{Notice, Notifier, NotifyError};
use std::collections::HashMap;

/// Webhook-backed chat transport
#[derive(Debug, Clone, Default)]
pub struct WebhookNotifier {
    channels: HashMap<String, String>,
}

impl WebhookNotifier {
    pub fn new(channels: HashMap<String, String>) -> Self {
        Self { channels }
    }

    fn resolve(&self, channel: &str) -> Result<String, NotifyError> {
        let url = self
            .channels
            .get(channel)
            .ok_or_else(|| NotifyError::UnknownChannel(channel.to_string()))?;
        if url.is_empty() {
            return Err(NotifyError::NoWebhook(channel.to_string()));
        }
        Ok(url.clone())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let channel = notice.channel.as_deref().ok_or(NotifyError::NoChannel)?;
        let url = self.resolve(channel)?;

        let payload = serde_json::json!({
            "title": notice.subject,
            "text": notice.body,
        });

        // ureq is blocking; keep it off the async workers.
        let channel = channel.to_string();
        let result = tokio::task::spawn_blocking(move || {
            ureq::post(&url)
                .send_json(&payload)
                .map_err(|e| NotifyError::Delivery(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        result?;
        tracing::info!(channel, "chat notification sent");
        Ok(())
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
