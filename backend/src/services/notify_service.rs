use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use shared::constants::APP_TITLE;
use shared::notify::NotifyError;
use shared::shared_wheel_game::WeightedItem;
use shared::totp::TotpVerifier;
use shared::wheel_modes::WheelMode;

use crate::config::NotifierConfig;

const EMBED_COLOR: u32 = 0xFFFF00;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EmbedThumbnail {
    pub url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedThumbnail>,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

fn link_or_na(label: &str, url: Option<String>) -> String {
    url.map(|url| format!("[{}]({})", label, url))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn build_payload(
    item: &WeightedItem,
    mode: WheelMode,
    asset: Option<&str>,
    timestamp: DateTime<Utc>,
) -> WebhookPayload {
    let embed = Embed {
        title: format!("🎡 We're killing **{}** in {} boys!", item.name, mode.title_label()),
        description: format!("**{}**", item.name),
        color: EMBED_COLOR,
        thumbnail: asset.map(|url| EmbedThumbnail { url: url.to_string() }),
        fields: vec![
            EmbedField {
                name: "🗺️ Getting There".to_string(),
                value: link_or_na("Transportation Guide", item.transport_url()),
                inline: true,
            },
            EmbedField {
                name: "⚔️ Equipment".to_string(),
                value: link_or_na("Equipment Setup", item.equipment_url()),
                inline: true,
            },
        ],
        footer: EmbedFooter {
            text: APP_TITLE.to_string(),
        },
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    WebhookPayload { embeds: vec![embed] }
}

/// Destination for announcement payloads.
pub trait WebhookSink: Send + Sync {
    fn post(&self, payload: &WebhookPayload) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

impl WebhookSink for DiscordWebhook {
    async fn post(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Transport(format!(
                "Failed to post to Discord: {} {}",
                status.as_u16(),
                body
            )));
        }

        Ok(())
    }
}

/// Gate in front of the webhook: nothing is sent unless the integration is
/// configured and the one-time code checks out.
pub struct WebhookNotifier<S> {
    verifier: Option<TotpVerifier>,
    sink: Option<S>,
}

impl<S: WebhookSink> WebhookNotifier<S> {
    pub fn new(verifier: Option<TotpVerifier>, sink: Option<S>) -> Self {
        Self { verifier, sink }
    }

    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some() && self.sink.is_some()
    }

    pub fn verifier(&self) -> Option<&TotpVerifier> {
        self.verifier.as_ref()
    }

    pub async fn notify(
        &self,
        item: &WeightedItem,
        mode: WheelMode,
        code: &str,
        asset: Option<&str>,
    ) -> Result<(), NotifyError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.notify_at(item, mode, code, asset, now).await
    }

    pub async fn notify_at(
        &self,
        item: &WeightedItem,
        mode: WheelMode,
        code: &str,
        asset: Option<&str>,
        unix_secs: u64,
    ) -> Result<(), NotifyError> {
        let (Some(verifier), Some(sink)) = (&self.verifier, &self.sink) else {
            return Err(NotifyError::Disabled);
        };

        if !verifier.verify_at(code, unix_secs) {
            warn!("Rejected announcement for {} ({}): invalid code", item.name, mode);
            return Err(NotifyError::InvalidCode);
        }

        let payload = build_payload(item, mode, asset, Utc::now());
        match sink.post(&payload).await {
            Ok(()) => {
                info!("Announced {} ({})", item.name, mode);
                Ok(())
            }
            Err(e) => {
                error!("Failed to announce {} ({}): {}", item.name, mode, e);
                Err(e)
            }
        }
    }
}

impl WebhookNotifier<DiscordWebhook> {
    pub fn from_config(config: &NotifierConfig) -> Self {
        if !config.enabled() {
            warn!("Discord integration is disabled: webhook id, token and TOTP secret are all required");
            return Self::disabled();
        }

        let verifier = match config.totp_secret.as_deref().map(TotpVerifier::from_base32) {
            Some(Ok(verifier)) => verifier,
            Some(Err(e)) => {
                error!("Discord integration is disabled: {}", e);
                return Self::disabled();
            }
            None => return Self::disabled(),
        };

        match config.webhook_url() {
            Some(url) => Self::new(Some(verifier), Some(DiscordWebhook::new(url))),
            None => Self::disabled(),
        }
    }
}
