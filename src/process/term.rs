use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use crate::process::raw_table::Cell;

/// Row numbering the Ads export prepends to some search terms, e.g. `"12 løb sko"`.
static LEADING_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s+").unwrap());

/// Canonicalise free text into a matching key.
///
/// Lower-cases and trims, keeps only `a-z`, `0-9`, `æ`, `ø`, `å` and whitespace,
/// collapses whitespace runs to a single space and trims again.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !is_term_char(c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// `normalize` over a parsed cell; missing cells become the empty term.
pub fn normalize_cell(cell: &Cell) -> String {
    match cell.as_text() {
        Some(text) => normalize(&text),
        None => String::new(),
    }
}

/// Ads variant: drop the leading row index before normalising.
pub fn normalize_ads_term(cell: &Cell) -> String {
    match cell.as_text() {
        Some(text) => normalize(&strip_leading_index(&text)),
        None => String::new(),
    }
}

pub fn strip_leading_index(text: &str) -> Cow<'_, str> {
    LEADING_INDEX.replace(text, "")
}

fn is_term_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, 'æ' | 'ø' | 'å')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_keeps_digits_and_danish_letters() {
        assert_eq!(normalize("Rødt Løb!! 123"), "rødt løb 123");
        assert_eq!(normalize("  ÆBLE-kage,  Århus \t  "), "æblekage århus");
    }

    #[test]
    fn collapses_whitespace_left_by_removed_symbols() {
        assert_eq!(normalize("sko ! & ! sko"), "sko sko");
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn drops_other_accented_letters() {
        assert_eq!(normalize("Café Über"), "caf ber");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "Rødt Løb!! 123",
            "  a   b  ",
            "İstanbul ß straße",
            "total: account",
            "\u{00a0}non\u{2003}breaking\u{00a0}",
            "ÅÆØ åæø",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn missing_cell_normalises_to_empty() {
        assert_eq!(normalize_cell(&Cell::Missing), "");
        assert_eq!(normalize_cell(&Cell::Integer(42)), "42");
    }

    #[test]
    fn ads_terms_lose_their_row_index() {
        assert_eq!(normalize_ads_term(&Cell::from_field("12 Løb Sko")), "løb sko");
        // digits without trailing whitespace are part of the term
        assert_eq!(normalize_ads_term(&Cell::from_field("123sko")), "123sko");
        assert_eq!(normalize_ads_term(&Cell::from_field("2024")), "2024");
    }
}
