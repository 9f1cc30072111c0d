//! HTML adapter for the public wager listing.
//!
//! One bet row renders as a `div.UserBet`; the `.sides` cell names the two
//! parties. Where the outcome lands depends on the rendering: the mobile
//! layout packs it into its own cell, the desktop layout spreads it over an
//! expanded block, and some variants only carry it in loose text. Each row
//! is therefore captured with all three regions so the resolver can fall
//! back across them.

use crate::config::config::ListingCfg;
use crate::core::error::SkipReason;
use crate::core::types::{WagerDocument, WagerEntry};
use crate::listing::client::ListingClient;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

pub struct HtmlListingClient {
    client: Client,
    cfg: ListingCfg,
}

impl HtmlListingClient {
    pub fn new(cfg: ListingCfg, client: Client) -> Self {
        Self { client, cfg }
    }

    fn bets_url(&self, capper: &str) -> String {
        format!(
            "{}/{}/bets?_pjax=%23profile",
            self.cfg.base_url.trim_end_matches('/'),
            capper
        )
    }

    /// Pure HTML -> document mapping, testable offline against fixtures.
    pub fn parse_document(html: &str) -> WagerDocument {
        let doc = Html::parse_document(html);
        let sel_item = Selector::parse("div.UserBet").unwrap();
        let sel_sides = Selector::parse(".sides").unwrap();
        let sel_mobile = Selector::parse(".bet-mobile .outcome").unwrap();
        let sel_block = Selector::parse(".bet-outcome").unwrap();

        let mut entries = Vec::new();

        for item in doc.select(&sel_item) {
            let sides = item
                .select(&sel_sides)
                .next()
                .map(flatten_text)
                .unwrap_or_default();
            if sides.is_empty() {
                continue;
            }

            entries.push(WagerEntry {
                sides,
                mobile_outcome: item.select(&sel_mobile).next().map(flatten_text),
                outcome_block: item.select(&sel_block).next().map(flatten_text),
                full_text: flatten_text(item),
            });
        }

        WagerDocument { entries }
    }
}

fn flatten_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl ListingClient for HtmlListingClient {
    async fn fetch_bets(&self, capper: &str) -> Result<WagerDocument, SkipReason> {
        let url = self.bets_url(capper);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SkipReason::FetchTimeout
            } else {
                SkipReason::FetchFailed(anyhow::Error::new(e).context("requesting wager listing"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SkipReason::FetchFailed(anyhow::anyhow!(
                "status {status} for {url}"
            )));
        }

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                SkipReason::FetchTimeout
            } else {
                SkipReason::FetchFailed(
                    anyhow::Error::new(e).context("reading wager listing body"),
                )
            }
        })?;

        Ok(Self::parse_document(&body))
    }
}
