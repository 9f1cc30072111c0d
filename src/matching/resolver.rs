//! Locates the wager entry for a requested fixture and pulls its declared
//! outcome and coefficient out of loosely structured scraped text.

use crate::core::error::SkipReason;
use crate::core::types::{PredictionRequest, ResolvedOutcome, WagerDocument, WagerEntry};
use crate::matching::teams::{sides_match, sides_text_match, split_fixture};
use crate::parse::vocabulary::OutcomeVocabulary;
use std::sync::Arc;

pub struct OutcomeResolver {
    vocab: Arc<OutcomeVocabulary>,
}

impl OutcomeResolver {
    pub fn new(vocab: Arc<OutcomeVocabulary>) -> Self {
        Self { vocab }
    }

    /// Walks the document in order and stops at the first entry whose sides
    /// cover the requested fixture (document order reflects recency, so
    /// first match wins over best match). Extraction then runs over an
    /// ordered list of sub-regions, desktop and mobile renderings put the
    /// outcome in different places:
    ///   1. the mobile outcome cell,
    ///   2. the expanded outcome block,
    ///   3. the entry's full flattened text.
    /// Outcome and coefficient fall through the tiers independently, odds are
    /// frequently rendered outside the outcome cell.
    pub fn resolve(
        &self,
        request: &PredictionRequest,
        document: &WagerDocument,
    ) -> Result<ResolvedOutcome, SkipReason> {
        let (team_a, team_b) = split_fixture(&request.teams).ok_or_else(|| {
            SkipReason::NoMatchingEntry {
                teams: request.teams.clone(),
            }
        })?;

        let entry = document
            .entries
            .iter()
            .find(|e| entry_matches(e, &team_a, &team_b))
            .ok_or_else(|| SkipReason::NoMatchingEntry {
                teams: request.teams.clone(),
            })?;

        let tiers = [
            entry.mobile_outcome.as_deref(),
            entry.outcome_block.as_deref(),
            Some(entry.full_text.as_str()),
        ];

        let outcome = tiers
            .iter()
            .flatten()
            .find_map(|t| self.vocab.find_outcome(t))
            .unwrap_or_default();
        // Outcome tokens are blanked out before the coefficient search so a
        // handicap offset like "(-1.5)" is never read as odds.
        let coef = tiers
            .iter()
            .flatten()
            .find_map(|t| self.vocab.find_entry_coef(&self.vocab.strip_outcomes(t)))
            .unwrap_or_default();

        if outcome.is_empty() && coef.is_empty() {
            return Err(SkipReason::OutcomeNotFound);
        }

        Ok(ResolvedOutcome { outcome, coef })
    }
}

fn entry_matches(entry: &WagerEntry, team_a: &str, team_b: &str) -> bool {
    match split_fixture(&entry.sides) {
        Some((left, right)) => sides_match(team_a, team_b, &left, &right),
        // No recognizable separator in the sides region, fall back to
        // whole-region containment.
        None => sides_text_match(team_a, team_b, &entry.sides),
    }
}
