//! Line grammar for "new forecast" announcements.
//!
//! Accepted shape (blank lines ignored, trailing stake line optional):
//!
//! ```text
//! Каппер - NeNaZavode добавил,
//! Новый прогноз - -
//! Футбол
//! Чемпионат Бразилии. Лига Кариока B2
//! Рио-де-Жанейро - Серра Макаенсе,
//! Начало матча 02 ноября 21:00
//! КФ ~2, Ставка 400у.е.
//! ```
//!
//! Anything else is rejected with the most specific missing-field reason.
//! A message that already names its outcome is not a pending prediction and
//! is rejected outright, whatever the rest of it looks like.

use crate::core::error::SkipReason;
use crate::core::types::PredictionRequest;
use crate::parse::vocabulary::OutcomeVocabulary;
use regex::Regex;
use std::sync::Arc;

/// Literal second line of every pending-forecast message.
pub const NEW_FORECAST_MARKER: &str = "Новый прогноз - -";

/// Expected-field states, walked strictly in order. Once a field is captured
/// it is never overwritten by a later matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Capper,
    Marker,
    Sport,
    League,
    Teams,
    Date,
    Trailer,
}

pub struct MessageParser {
    vocab: Arc<OutcomeVocabulary>,
    capper_re: Regex,
    teams_re: Regex,
    start_re: Regex,
}

impl MessageParser {
    pub fn new(vocab: Arc<OutcomeVocabulary>) -> Self {
        Self {
            vocab,
            // "Каппер - <name> добавил,"; the name runs to the first comma
            // or whitespace.
            capper_re: Regex::new(r"(?i)^Каппер\s*-\s*([^\s,]+)(?:\s+добавил)?[,;]?\s*$")
                .expect("capper line pattern"),
            // "<left> - <right>,": a dash-separated pair with a trailing comma.
            teams_re: Regex::new(r"^\s*.+\s[-‐‑–—−]\s.+,\s*$").expect("teams line pattern"),
            start_re: Regex::new(r"(?i)^Начало\s+матча\s+(.+)$").expect("start line pattern"),
        }
    }

    /// Turns raw message text into a request, or the reason it was skipped.
    /// No partial results: either every mandatory field is present or the
    /// call fails.
    pub fn parse(&self, raw_text: &str) -> Result<PredictionRequest, SkipReason> {
        let msg = raw_text.replace("\r\n", "\n").replace('\r', "\n");

        if msg.trim().is_empty() {
            return Err(SkipReason::EmptyMessage);
        }
        // An already-resolved tip never reaches request construction,
        // regardless of otherwise-valid grammar.
        if self.vocab.contains_outcome(&msg) {
            return Err(SkipReason::OutcomeAlreadyPresent);
        }
        if !msg.contains(NEW_FORECAST_MARKER) {
            return Err(SkipReason::MissingMarker);
        }

        let mut state = Expect::Capper;
        let mut capper = String::new();
        let mut sport = String::new();
        let mut league = String::new();
        let mut teams = String::new();
        let mut date = String::new();
        let mut declared_coef = None;

        for line in msg.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match state {
                Expect::Capper => match self.capper_re.captures(line) {
                    Some(c) => {
                        capper = c[1].trim().to_string();
                        state = Expect::Marker;
                    }
                    None => return Err(SkipReason::MalformedCapperLine),
                },
                Expect::Marker => {
                    if line != NEW_FORECAST_MARKER {
                        return Err(SkipReason::MissingMarker);
                    }
                    state = Expect::Sport;
                }
                Expect::Sport => {
                    sport = line.to_string();
                    state = Expect::League;
                }
                Expect::League => {
                    league = line.to_string();
                    state = Expect::Teams;
                }
                Expect::Teams => {
                    // The teams line must show up before the date line.
                    if self.start_re.is_match(line) {
                        return Err(SkipReason::MissingTeamsLine);
                    }
                    if self.teams_re.is_match(line) {
                        teams = line.trim_end_matches([',', ' ']).to_string();
                        state = Expect::Date;
                    }
                }
                Expect::Date => {
                    if let Some(c) = self.start_re.captures(line) {
                        date = c[1].trim().to_string();
                        state = Expect::Trailer;
                    }
                }
                Expect::Trailer => {
                    if declared_coef.is_none() {
                        declared_coef = self.vocab.find_coef(line);
                    }
                }
            }
        }

        match state {
            Expect::Capper => Err(SkipReason::MalformedCapperLine),
            Expect::Marker => Err(SkipReason::MissingMarker),
            Expect::Sport => Err(SkipReason::MissingSportLine),
            Expect::League => Err(SkipReason::MissingLeagueLine),
            Expect::Teams => Err(SkipReason::MissingTeamsLine),
            Expect::Date => Err(SkipReason::MissingDateLine),
            Expect::Trailer => Ok(PredictionRequest {
                capper,
                sport,
                league,
                teams,
                date,
                declared_coef,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new(Arc::new(OutcomeVocabulary::new()))
    }

    const SAMPLE: &str = "Каппер - NeNaZavode добавил,\n\
Новый прогноз - -\n\
Футбол\n\
Чемпионат Бразилии. Лига Кариока B2\n\
Рио-де-Жанейро - Серра Макаенсе,\n\
Начало матча 02 ноября 21:00";

    #[test]
    fn test_parses_sample_message() {
        let req = parser().parse(SAMPLE).unwrap();
        assert_eq!(req.capper, "NeNaZavode");
        assert_eq!(req.sport, "Футбол");
        assert_eq!(req.league, "Чемпионат Бразилии. Лига Кариока B2");
        assert_eq!(req.teams, "Рио-де-Жанейро - Серра Макаенсе");
        assert_eq!(req.date, "02 ноября 21:00");
        assert_eq!(req.declared_coef, None);
    }

    #[test]
    fn test_captures_trailing_coef() {
        let msg = format!("{SAMPLE}\nКФ ~2, Ставка 400у.е.");
        let req = parser().parse(&msg).unwrap();
        assert_eq!(req.declared_coef.as_deref(), Some("~2"));
    }

    #[test]
    fn test_blank_lines_and_crlf_are_ignored() {
        let msg = SAMPLE.replace('\n', "\r\n\r\n");
        let req = parser().parse(&msg).unwrap();
        assert_eq!(req.capper, "NeNaZavode");
        assert_eq!(req.date, "02 ноября 21:00");
    }

    #[test]
    fn test_rejects_message_with_outcome_anywhere() {
        let msg = format!("{SAMPLE}\nП1");
        assert!(matches!(
            parser().parse(&msg),
            Err(SkipReason::OutcomeAlreadyPresent)
        ));
    }

    #[test]
    fn test_outcome_check_precedes_grammar() {
        // Not even close to the grammar, but the outcome token decides.
        assert!(matches!(
            parser().parse("вчера зашло ТБ (2.5), сегодня повторим"),
            Err(SkipReason::OutcomeAlreadyPresent)
        ));
    }

    #[test]
    fn test_rejects_missing_marker() {
        let msg = SAMPLE.replace("Новый прогноз - -\n", "");
        assert!(matches!(parser().parse(&msg), Err(SkipReason::MissingMarker)));
    }

    #[test]
    fn test_rejects_malformed_capper_line() {
        let msg = SAMPLE.replace("Каппер - NeNaZavode добавил,", "NeNaZavode добавил,");
        assert!(matches!(
            parser().parse(&msg),
            Err(SkipReason::MalformedCapperLine)
        ));
    }

    #[test]
    fn test_rejects_date_line_before_teams_line() {
        let msg = "Каппер - NeNaZavode добавил,\n\
Новый прогноз - -\n\
Футбол\n\
Лига\n\
Начало матча 02 ноября 21:00";
        assert!(matches!(
            parser().parse(msg),
            Err(SkipReason::MissingTeamsLine)
        ));
    }

    #[test]
    fn test_rejects_missing_date_line() {
        let msg = "Каппер - NeNaZavode добавил,\n\
Новый прогноз - -\n\
Футбол\n\
Лига\n\
Рио-де-Жанейро - Серра Макаенсе,";
        assert!(matches!(
            parser().parse(msg),
            Err(SkipReason::MissingDateLine)
        ));
    }

    #[test]
    fn test_rejects_empty_message() {
        assert!(matches!(parser().parse("  \n "), Err(SkipReason::EmptyMessage)));
    }

    #[test]
    fn test_fields_come_back_trimmed() {
        let msg = "Каппер -   NeNaZavode   добавил,\n\
Новый прогноз - -\n\
  Футбол  \n\
  Лига  \n\
  Рио-де-Жанейро - Серра Макаенсе,  \n\
  Начало матча   02 ноября 21:00  ";
        let req = parser().parse(msg).unwrap();
        assert_eq!(req.capper, "NeNaZavode");
        assert_eq!(req.sport, "Футбол");
        assert_eq!(req.league, "Лига");
        assert_eq!(req.teams, "Рио-де-Жанейро - Серра Макаенсе");
        assert_eq!(req.date, "02 ноября 21:00");
    }
}
