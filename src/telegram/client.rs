//! Minimal Bot API surface: long-polled updates in, plain-text messages out.

use crate::config::config::TelegramCfg;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct TgClient {
    client: Client,
    cfg: TelegramCfg,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
    #[serde(default)]
    pub channel_post: Option<TgMessage>,
}

impl Update {
    /// Direct messages and channel posts carry the same payload shape.
    pub fn content(&self) -> Option<&TgMessage> {
        self.message.as_ref().or(self.channel_post.as_ref())
    }
}

#[derive(Debug, Deserialize)]
pub struct TgMessage {
    pub chat: TgChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TgChat {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

impl TgClient {
    pub fn new(cfg: TelegramCfg, client: Client) -> Self {
        Self { client, cfg }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.cfg.api_url.trim_end_matches('/'),
            self.cfg.bot_token,
            method
        )
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.cfg.poll_timeout.as_secs().to_string()),
            ])
            // the long poll must outlive the shared client's timeout
            .timeout(self.cfg.poll_timeout + Duration::from_secs(5))
            .send()
            .await
            .context("requesting updates")?
            .error_for_status()?;

        let api: ApiResponse<Vec<Update>> = resp.json().await.context("parsing updates")?;
        if !api.ok {
            anyhow::bail!(
                "getUpdates rejected: {}",
                api.description.unwrap_or_else(|| "no description".into())
            );
        }
        Ok(api.result.unwrap_or_default())
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .context("sending message")?
            .error_for_status()?;

        let api: ApiResponse<serde_json::Value> =
            resp.json().await.context("parsing send response")?;
        if !api.ok {
            anyhow::bail!(
                "sendMessage rejected: {}",
                api.description.unwrap_or_else(|| "no description".into())
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_hides_no_surprises() {
        let tg = TgClient::new(
            TelegramCfg {
                api_url: "https://api.telegram.org/".into(),
                bot_token: "123:abc".into(),
                ..Default::default()
            },
            Client::new(),
        );
        assert_eq!(
            tg.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_update_content_prefers_message() {
        let update: Update = serde_json::from_str(
            r#"{"update_id": 7, "channel_post": {"chat": {"id": -100, "title": "Прогнозы"}, "text": "привет"}}"#,
        )
        .unwrap();
        let msg = update.content().unwrap();
        assert_eq!(msg.chat.id, -100);
        assert_eq!(msg.text.as_deref(), Some("привет"));
    }
}
