use crate::bus::types::Bus;
use crate::core::types::{Actor, RawMessage};
use crate::telegram::client::TgClient;
use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Bridges the chat stream onto the bus: long-polls for updates and
/// publishes every text message as a RawMessage, in arrival order.
pub struct ChatSourceActor {
    pub bus: Bus,
    pub tg: TgClient,
    pub shutdown: CancellationToken,
}

impl ChatSourceActor {
    pub fn new(bus: Bus, tg: TgClient, shutdown: CancellationToken) -> ChatSourceActor {
        Self { bus, tg, shutdown }
    }

    async fn drain_updates(&self, offset: &mut i64) -> Result<()> {
        let updates = self.tg.get_updates(*offset).await?;

        for update in updates {
            *offset = (*offset).max(update.update_id + 1);

            let Some(msg) = update.content() else {
                debug!(update_id = update.update_id, "non-message update skipped");
                continue;
            };
            let Some(text) = msg.text.as_deref() else {
                continue;
            };

            let raw = RawMessage {
                chat_id: msg.chat.id,
                chat_title: msg.chat.title.clone().unwrap_or_default(),
                text: text.to_string(),
            };
            if let Err(e) = self.bus.raw_messages.publish(raw).await {
                tracing::warn!(?e, "publish raw message failed");
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Actor for ChatSourceActor {
    async fn run(self) -> Result<()> {
        info!("ChatSourceActor started");

        let mut offset = 0i64;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("ChatSourceActor: shutdown requested");
                    break;
                }

                res = self.drain_updates(&mut offset) => {
                    if let Err(e) = res {
                        error!("ChatSourceActor: update poll failed: {}", e);
                        // backoff to avoid a hot loop on repeated failures;
                        // shutdown still has to cut it short
                        tokio::select! {
                            _ = self.shutdown.cancelled() => {
                                info!("ChatSourceActor: shutdown requested");
                                break;
                            }
                            _ = tokio::time::sleep(Duration::from_secs(5)) => {}
                        }
                    }
                }
            }
        }

        info!("ChatSourceActor stopped cleanly");
        Ok(())
    }
}
