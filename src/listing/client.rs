use crate::core::error::SkipReason;
use crate::core::types::WagerDocument;
use async_trait::async_trait;

/// Source of a capper's current wager listing. The resolver only ever sees
/// the already-fetched, already-parsed document.
#[async_trait]
pub trait ListingClient: Send + Sync + 'static {
    async fn fetch_bets(&self, capper: &str) -> Result<WagerDocument, SkipReason>;
}
