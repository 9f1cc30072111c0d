//! Canonical notification rendering. Pure and total: absent fields degrade
//! to placeholder glyphs, nothing here ever fails.

use crate::core::types::{PredictionRequest, ResolvedOutcome};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write;

lazy_static! {
    static ref SPACED_DASH_RE: Regex = Regex::new(r"\s+[-‐‑–—−]\s+").unwrap();
}

/// Russian genitive month name -> two-digit month number.
pub(crate) fn ru_month_number(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "января" => Some("01"),
        "февраля" => Some("02"),
        "марта" => Some("03"),
        "апреля" => Some("04"),
        "мая" => Some("05"),
        "июня" => Some("06"),
        "июля" => Some("07"),
        "августа" => Some("08"),
        "сентября" => Some("09"),
        "октября" => Some("10"),
        "ноября" => Some("11"),
        "декабря" => Some("12"),
        _ => None,
    }
}

/// "02 ноября 21:00" -> "02.11 — 21:00". Anything that does not look like
/// `<day> <month-name> <time>` comes back unmodified.
fn format_date(date: &str) -> String {
    let parts: Vec<&str> = date.split_whitespace().collect();
    if parts.len() < 3 {
        return date.to_string();
    }

    match ru_month_number(parts[1]) {
        Some(month) => {
            let time = parts[parts.len() - 1];
            format!("{}.{} — {}", parts[0], month, time)
        }
        None => date.to_string(),
    }
}

/// Dash separators between the two parties become an em-dash for display.
/// Hyphens inside a single name ("Рио-де-Жанейро") are left alone.
fn format_teams(teams: &str) -> String {
    SPACED_DASH_RE.replace_all(teams, " — ").into_owned()
}

/// Renders the final notification text. The resolved coefficient wins over
/// the one declared in the source message; missing outcome shows as "—",
/// missing coefficient as "?".
pub fn format_notification(request: &PredictionRequest, resolved: &ResolvedOutcome) -> String {
    let outcome = match resolved.outcome.trim() {
        "" => "—".to_string(),
        o => o.to_string(),
    };

    let coef_src = match resolved.coef.trim() {
        "" => request.declared_coef.as_deref().unwrap_or("").trim(),
        c => c,
    };
    let coef = match coef_src {
        "" => "?".to_string(),
        c if c.starts_with('~') => c.to_string(),
        c => format!("~{c}"),
    };

    let mut b = String::new();

    if !request.sport.is_empty() {
        let _ = writeln!(b, "{}", request.sport);
    }
    if !request.league.is_empty() {
        let _ = writeln!(b, "{}", request.league);
    }
    if !request.sport.is_empty() || !request.league.is_empty() {
        b.push('\n');
    }

    let _ = write!(
        b,
        "🕓 {}\n{}\n\n",
        format_date(&request.date),
        format_teams(&request.teams)
    );
    let _ = writeln!(b, "🎯 {outcome}");
    let _ = write!(b, "📈 Кф: {coef}");

    b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PredictionRequest {
        PredictionRequest {
            capper: "NeNaZavode".into(),
            sport: "Футбол".into(),
            league: "Чемпионат Бразилии. Лига Кариока B2".into(),
            teams: "Рио-де-Жанейро - Серра Макаенсе".into(),
            date: "02 ноября 21:00".into(),
            declared_coef: None,
        }
    }

    #[test]
    fn test_renders_sample_notification() {
        let text = format_notification(
            &request(),
            &ResolvedOutcome {
                outcome: "Ф1 (-1.5)".into(),
                coef: "~2.1".into(),
            },
        );

        assert_eq!(
            text,
            "Футбол\n\
Чемпионат Бразилии. Лига Кариока B2\n\
\n\
🕓 02.11 — 21:00\n\
Рио-де-Жанейро — Серра Макаенсе\n\
\n\
🎯 Ф1 (-1.5)\n\
📈 Кф: ~2.1"
        );
    }

    #[test]
    fn test_total_over_absent_fields() {
        let mut req = request();
        req.sport.clear();
        req.league.clear();

        let text = format_notification(
            &req,
            &ResolvedOutcome {
                outcome: "".into(),
                coef: "".into(),
            },
        );

        assert!(!text.is_empty());
        assert!(text.contains("🎯 —"));
        assert!(text.contains("📈 Кф: ?"));
        assert!(!text.starts_with('\n'));
    }

    #[test]
    fn test_declared_coef_is_display_fallback_only() {
        let mut req = request();
        req.declared_coef = Some("~2".into());

        let resolved_wins = format_notification(
            &req,
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "~3.4".into(),
            },
        );
        assert!(resolved_wins.contains("📈 Кф: ~3.4"));

        let fallback = format_notification(
            &req,
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "".into(),
            },
        );
        assert!(fallback.contains("📈 Кф: ~2"));
    }

    #[test]
    fn test_coef_gets_tilde_prefix() {
        let text = format_notification(
            &request(),
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "2.05".into(),
            },
        );
        assert!(text.contains("📈 Кф: ~2.05"));
    }

    #[test]
    fn test_unknown_month_falls_back_to_raw_date() {
        let mut req = request();
        req.date = "02 listopada 21:00".into();
        let text = format_notification(
            &req,
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "~2".into(),
            },
        );
        assert!(text.contains("🕓 02 listopada 21:00"));
    }

    #[test]
    fn test_short_date_passes_through() {
        let mut req = request();
        req.date = "21:00".into();
        let text = format_notification(
            &req,
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "~2".into(),
            },
        );
        assert!(text.contains("🕓 21:00"));
    }

    #[test]
    fn test_inner_hyphens_survive_team_display() {
        let text = format_notification(
            &request(),
            &ResolvedOutcome {
                outcome: "П1".into(),
                coef: "~2".into(),
            },
        );
        assert!(text.contains("Рио-де-Жанейро — Серра Макаенсе"));
    }
}
