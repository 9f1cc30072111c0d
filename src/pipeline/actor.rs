//! The extraction-and-reconciliation pipeline: Parse -> Resolve -> Format,
//! one inbound message at a time. Any failure is terminal for that message
//! and logged with its classified reason; the next message is unaffected.

use crate::bus::types::Bus;
use crate::core::error::SkipReason;
use crate::core::types::{Actor, Notification, RawMessage};
use crate::listing::client::ListingClient;
use crate::matching::resolver::OutcomeResolver;
use crate::parse::grammar::MessageParser;
use crate::parse::vocabulary::OutcomeVocabulary;
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct PipelineActor {
    pub bus: Bus,
    pub shutdown: CancellationToken,
    parser: MessageParser,
    resolver: OutcomeResolver,
    listing: Arc<dyn ListingClient>,
}

impl PipelineActor {
    pub fn new(
        bus: Bus,
        shutdown: CancellationToken,
        vocab: Arc<OutcomeVocabulary>,
        listing: Arc<dyn ListingClient>,
    ) -> PipelineActor {
        Self {
            bus,
            shutdown,
            parser: MessageParser::new(vocab.clone()),
            resolver: OutcomeResolver::new(vocab),
            listing,
        }
    }

    /// One full pass for one message. The listing is fetched fresh per
    /// invocation; no retry here, retry policy belongs to the caller.
    pub async fn handle_message(&self, msg: &RawMessage) -> Result<Notification, SkipReason> {
        let request = self.parser.parse(&msg.text)?;

        let document = self.listing.fetch_bets(&request.capper).await?;
        let resolved = self.resolver.resolve(&request, &document)?;

        info!(
            capper = %request.capper,
            teams = %request.teams,
            date = %request.date,
            "prediction resolved"
        );

        Ok(Notification {
            capper: request.capper.clone(),
            text: crate::format::notify::format_notification(&request, &resolved),
        })
    }
}

#[async_trait::async_trait]
impl Actor for PipelineActor {
    async fn run(self) -> Result<()> {
        info!("PipelineActor started");

        let mut rx = self.bus.raw_messages.subscribe();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("PipelineActor: shutdown requested");
                    break;
                }

                res = rx.recv() => {
                    match res {
                        Ok(msg) => {
                            // strictly sequential: the previous message is
                            // fully processed before the next one starts
                            match self.handle_message(&msg).await {
                                Ok(notification) => {
                                    if let Err(e) = self.bus.notifications.publish(notification).await {
                                        warn!(?e, "publish notification failed");
                                    }
                                }
                                Err(reason) => {
                                    info!(chat = %msg.chat_title, %reason, "message skipped");
                                }
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!(missed = n, "raw message stream lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        info!("PipelineActor stopped cleanly");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{WagerDocument, WagerEntry};
    use async_trait::async_trait;

    struct FixedListing(WagerDocument);

    #[async_trait]
    impl ListingClient for FixedListing {
        async fn fetch_bets(&self, _capper: &str) -> Result<WagerDocument, SkipReason> {
            Ok(self.0.clone())
        }
    }

    struct FailingListing;

    #[async_trait]
    impl ListingClient for FailingListing {
        async fn fetch_bets(&self, _capper: &str) -> Result<WagerDocument, SkipReason> {
            Err(SkipReason::FetchTimeout)
        }
    }

    fn actor(listing: Arc<dyn ListingClient>) -> PipelineActor {
        PipelineActor::new(
            Bus::new(),
            CancellationToken::new(),
            Arc::new(OutcomeVocabulary::new()),
            listing,
        )
    }

    fn raw(text: &str) -> RawMessage {
        RawMessage {
            chat_id: 1,
            chat_title: "Прогнозы".into(),
            text: text.into(),
        }
    }

    const SAMPLE: &str = "Каппер - NeNaZavode добавил,\n\
Новый прогноз - -\n\
Футбол\n\
Чемпионат Бразилии. Лига Кариока B2\n\
Рио-де-Жанейро - Серра Макаенсе,\n\
Начало матча 02 ноября 21:00";

    #[tokio::test]
    async fn test_end_to_end_happy_path() {
        let doc = WagerDocument {
            entries: vec![WagerEntry {
                sides: "Рио—де—Жанейро — Серра Макаенсе".into(),
                mobile_outcome: Some("Ф1 (-1.5)".into()),
                full_text: "Рио—де—Жанейро — Серра Макаенсе Ставка 400у.е. кф ~2.1".into(),
                ..Default::default()
            }],
        };

        let n = actor(Arc::new(FixedListing(doc)))
            .handle_message(&raw(SAMPLE))
            .await
            .unwrap();

        assert_eq!(n.capper, "NeNaZavode");
        assert!(n.text.contains("🕓 02.11 — 21:00"));
        assert!(n.text.contains("Рио-де-Жанейро — Серра Макаенсе"));
        assert!(n.text.contains("🎯 Ф1 (-1.5)"));
        assert!(n.text.contains("📈 Кф: ~2.1"));
    }

    #[tokio::test]
    async fn test_parse_failure_short_circuits_before_fetch() {
        let res = actor(Arc::new(FailingListing))
            .handle_message(&raw("просто болтовня"))
            .await;
        // the skip reason is the parser's, not the listing's
        assert!(matches!(res, Err(SkipReason::MissingMarker)));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let res = actor(Arc::new(FailingListing))
            .handle_message(&raw(SAMPLE))
            .await;
        assert!(matches!(res, Err(SkipReason::FetchTimeout)));
    }

    #[tokio::test]
    async fn test_unlisted_fixture_yields_no_matching_entry() {
        let doc = WagerDocument {
            entries: vec![WagerEntry {
                sides: "Атлетико — Севилья".into(),
                full_text: "Атлетико — Севилья П1 ~1.8".into(),
                ..Default::default()
            }],
        };
        let res = actor(Arc::new(FixedListing(doc)))
            .handle_message(&raw(SAMPLE))
            .await;
        assert!(matches!(res, Err(SkipReason::NoMatchingEntry { .. })));
    }
}
