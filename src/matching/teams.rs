//! Team-name normalization and fixture matching.
//!
//! Scraped listings disagree with announcements on dash characters, case,
//! whitespace and club-name qualifiers, so fixtures are compared on
//! normalized containment rather than equality.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // hyphen, non-breaking hyphens, en/em dash, minus sign
    static ref DASH_RE: Regex = Regex::new(r"[‐‑‒–—−]").unwrap();
    static ref SPACED_DASH_RE: Regex = Regex::new(r"\s-\s").unwrap();
}

/// Canonical form for comparisons: trimmed, single-spaced, lowercased, every
/// dash-family character folded to an ASCII hyphen, trailing commas gone.
/// Idempotent.
pub fn normalize(name: &str) -> String {
    let unified = DASH_RE.replace_all(name, "-");
    let collapsed = unified
        .replace('\u{00A0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .to_lowercase()
        .trim_end_matches([',', ' '])
        .to_string()
}

/// Splits a matchup string into its two parties on the first spaced
/// dash-family separator, falling back to the first bare dash. Returns None
/// when no second party can be found.
pub fn split_fixture(teams: &str) -> Option<(String, String)> {
    let norm = normalize(teams);

    let (left, right) = match SPACED_DASH_RE.find(&norm) {
        Some(m) => (&norm[..m.start()], &norm[m.end()..]),
        None => {
            let idx = norm.find('-')?;
            (&norm[..idx], &norm[idx + 1..])
        }
    };

    let left = left.trim();
    let right = right.trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left.to_string(), right.to_string()))
}

/// Whether a scraped entry's two parties cover the requested pair, in either
/// left-right order. Containment, not equality: listings routinely append
/// qualifiers the announcement omits.
pub fn sides_match(req_a: &str, req_b: &str, cand_left: &str, cand_right: &str) -> bool {
    let a = normalize(req_a);
    let b = normalize(req_b);
    let left = normalize(cand_left);
    let right = normalize(cand_right);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    (left.contains(&a) && right.contains(&b)) || (left.contains(&b) && right.contains(&a))
}

/// Fallback for entries whose sides region does not split cleanly: both
/// requested parties must appear somewhere in the region's text.
pub fn sides_text_match(req_a: &str, req_b: &str, sides_text: &str) -> bool {
    let a = normalize(req_a);
    let b = normalize(req_b);
    let text = normalize(sides_text);

    !a.is_empty() && !b.is_empty() && text.contains(&a) && text.contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dashes_case_and_whitespace() {
        assert_eq!(normalize("Рио—де–Жанейро,"), "рио-де-жанейро");
        assert_eq!(normalize("  Рио—де–Жанейро ,"), "рио-де-жанейро");
        assert_eq!(normalize("Серра\u{00A0} Макаенсе"), "серра макаенсе");
        assert_eq!(normalize("ЦСКА   Москва"), "цска москва");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["Рио—де–Жанейро,", "  ЦСКА   Москва  ", "A − B", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_split_fixture_prefers_spaced_separator() {
        let (a, b) = split_fixture("Рио-де-Жанейро - Серра Макаенсе").unwrap();
        assert_eq!(a, "рио-де-жанейро");
        assert_eq!(b, "серра макаенсе");
    }

    #[test]
    fn test_split_fixture_falls_back_to_bare_dash() {
        let (a, b) = split_fixture("Спартак-Динамо").unwrap();
        assert_eq!(a, "спартак");
        assert_eq!(b, "динамо");
        assert_eq!(split_fixture("Спартак"), None);
    }

    #[test]
    fn test_split_fixture_handles_unicode_dashes() {
        let (a, b) = split_fixture("Реал — Барселона").unwrap();
        assert_eq!(a, "реал");
        assert_eq!(b, "барселона");
    }

    #[test]
    fn test_sides_match_containment_and_swap() {
        assert!(sides_match("Реал", "Барселона", "Реал Мадрид", "ФК Барселона"));
        // swapped sides still count
        assert!(sides_match("Реал", "Барселона", "ФК Барселона", "Реал Мадрид"));
        assert!(!sides_match("Реал", "Барселона", "Реал Мадрид", "Атлетико"));
    }

    #[test]
    fn test_sides_match_is_symmetric_in_request_order() {
        let cases = [
            ("Реал", "Барселона", "Реал Мадрид", "ФК Барселона"),
            ("Реал", "Барселона", "Атлетико", "Севилья"),
            ("Рио-де-Жанейро", "Серра Макаенсе", "Рио—де—Жанейро", "Серра Макаенсе U20"),
        ];
        for (a, b, l, r) in cases {
            assert_eq!(sides_match(a, b, l, r), sides_match(b, a, l, r));
        }
    }

    #[test]
    fn test_sides_text_match_on_unsplit_region() {
        assert!(sides_text_match(
            "Рио-де-Жанейро",
            "Серра Макаенсе",
            "Футбол · Рио—де—Жанейро vs Серра Макаенсе,"
        ));
        assert!(!sides_text_match("Реал", "Барселона", "Реал Мадрид — Атлетико"));
    }
}
