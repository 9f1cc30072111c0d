//! Shared bet-outcome and coefficient patterns.
//!
//! One compiled, read-only set used from both sides of the pipeline: the
//! parser rejects messages that already state an outcome, the resolver pulls
//! outcomes out of scraped wager entries. Recognized families:
//!   - handicaps:      Ф1 (-1.5), Ф2 +0.75
//!   - totals:         ТБ (2.5), ТМ 3
//!   - money line:     П1, П2, X
//!   - double chance:  1X, 12, X2
//!   - both score:     ОЗ, "обе забьют"

use crate::format::notify::ru_month_number;
use regex::Regex;

/// Compiled once at startup, then shared read-only (cheap to clone an Arc,
/// safe for unlimited concurrent reads).
pub struct OutcomeVocabulary {
    outcome_re: Regex,
    ambiguous_re: Regex,
    tilde_coef_re: Regex,
    decimal_coef_re: Regex,
    plain_coef_re: Regex,
}

impl OutcomeVocabulary {
    pub fn new() -> Self {
        Self {
            // Unambiguous tokens: handicap/total with an offset (parenthesized
            // or bare), П1/П2, 1X/X2 (latin or cyrillic X), ОЗ, "обе забьют".
            outcome_re: Regex::new(
                r"(?i)(?:Т[БМ]\s*\(\s*\d+(?:[.,]\d+)?\s*\)|\bТ[БМ]\s*\d+(?:[.,]\d+)?\b|Ф[12]\s*\(\s*[-+−]?\d+(?:[.,]\d+)?\s*\)|\bФ[12]\s*[-+−]?\d+(?:[.,]\d+)?\b|\bП[12]\b|\b1[XХ]\b|\b[XХ]2\b|\bОЗ\b|\bобе\s+забьют\b)",
            )
            .expect("outcome pattern"),
            // "12" (double chance) and bare "X" (draw) collide with ordinary
            // text, so they match only as standalone words and never glued to
            // a colon (times like 12:30 are not outcomes).
            ambiguous_re: Regex::new(r"(?i)(?:^|[\s(])(12|[XХ])(?:[)\s.,;!?]|$)")
                .expect("ambiguous outcome pattern"),
            tilde_coef_re: Regex::new(r"~\s*\d+(?:[.,]\d+)?").expect("tilde coef pattern"),
            decimal_coef_re: Regex::new(r"\b\d+[.,]\d+\b").expect("decimal coef pattern"),
            plain_coef_re: Regex::new(r"\b\d+\b").expect("plain coef pattern"),
        }
    }

    /// First outcome token found in `text`, as it appears in the source.
    pub fn find_outcome(&self, text: &str) -> Option<String> {
        if let Some(m) = self.outcome_re.find(text) {
            return Some(m.as_str().trim().to_string());
        }

        for cap in self.ambiguous_re.captures_iter(text) {
            let token = cap.get(1).expect("ambiguous token group");
            // A standalone "12" followed by a month name is a day of month
            // ("Начало матча 12 ноября"), not a double-chance bet.
            if token.as_str() == "12" && followed_by_month(&text[token.end()..]) {
                continue;
            }
            return Some(token.as_str().to_string());
        }

        None
    }

    pub fn contains_outcome(&self, text: &str) -> bool {
        self.find_outcome(text).is_some()
    }

    /// `text` with every outcome token blanked out. Handicap and total
    /// tokens embed decimals ("Ф1 (-1.5)") that must not be mistaken for
    /// odds when searching the same region for a coefficient.
    pub fn strip_outcomes(&self, text: &str) -> String {
        self.outcome_re.replace_all(text, " ").into_owned()
    }

    /// First coefficient token in `text`. Tilde-prefixed values win over bare
    /// decimals, bare decimals over lone integers, so that scores and stake
    /// sizes in surrounding text do not shadow the actual odds. Only for
    /// announcement trailer lines, where a lone integer can only be the
    /// declared coefficient.
    pub fn find_coef(&self, text: &str) -> Option<String> {
        if let Some(m) = self.tilde_coef_re.find(text) {
            return Some(m.as_str().split_whitespace().collect());
        }
        if let Some(m) = self.decimal_coef_re.find(text) {
            return Some(m.as_str().to_string());
        }
        self.plain_coef_re
            .find(text)
            .map(|m| m.as_str().to_string())
    }

    /// Coefficient search for scraped entry text: tilde-prefixed value, else
    /// first bare decimal. No lone-integer fallback here; entry headers are
    /// full of day numbers and clock hours, and an entry without real odds
    /// must resolve to "no coefficient", not to a date fragment.
    pub fn find_entry_coef(&self, text: &str) -> Option<String> {
        if let Some(m) = self.tilde_coef_re.find(text) {
            return Some(m.as_str().split_whitespace().collect());
        }
        self.decimal_coef_re
            .find(text)
            .map(|m| m.as_str().to_string())
    }
}

impl Default for OutcomeVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

fn followed_by_month(rest: &str) -> bool {
    rest.split_whitespace()
        .next()
        .map(|w| ru_month_number(w).is_some())
        .unwrap_or(false)
}
