use crate::bus::types::Bus;
use crate::core::types::Actor;
use crate::telegram::client::TgClient;
use anyhow::Result;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Routes formatted notifications to each capper's admin channel. A capper
/// without a configured channel is a logged skip; delivery failures are
/// logged and not retried.
pub struct OutboundActor {
    pub bus: Bus,
    pub tg: TgClient,
    /// capper slug -> destination chat id
    pub channels: HashMap<String, i64>,
    pub shutdown: CancellationToken,
}

impl OutboundActor {
    pub fn new(
        bus: Bus,
        tg: TgClient,
        channels: HashMap<String, i64>,
        shutdown: CancellationToken,
    ) -> OutboundActor {
        Self {
            bus,
            tg,
            channels,
            shutdown,
        }
    }
}

#[async_trait::async_trait]
impl Actor for OutboundActor {
    async fn run(self) -> Result<()> {
        info!("OutboundActor started");

        let mut rx = self.bus.notifications.subscribe();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("OutboundActor: shutdown requested");
                    break;
                }

                res = rx.recv() => {
                    match res {
                        Ok(n) => {
                            let Some(&chat_id) = self.channels.get(&n.capper) else {
                                warn!(capper = %n.capper, "no target channel configured");
                                continue;
                            };
                            if let Err(e) = self.tg.send_message(chat_id, &n.text).await {
                                error!(capper = %n.capper, chat_id, "send failed: {}", e);
                            } else {
                                info!(capper = %n.capper, chat_id, "notification sent");
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!(missed = n, "notification stream lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        info!("OutboundActor stopped cleanly");
        Ok(())
    }
}
