// src/normalize.rs
//! Canonical text forms for title matching.
//!
//! Everything here produces comparison keys, never display strings: the raw
//! title stays on the record, the normalized form only feeds the similarity
//! scorer and the candidate resolver.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
static RE_NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("non-alnum regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));
static RE_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpart\b").expect("part regex"));

/// Whole-word numeral rewrites: Roman numerals (ii..x) and spelled-out
/// numbers (zero..ten) both collapse onto Arabic digits, so "Part II",
/// "Part Two" and "Part 2" end up identical.
static NUMERALS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let pairs: &[(&str, &str)] = &[
        ("iii", "3"),
        ("ii", "2"),
        ("iv", "4"),
        ("v", "5"),
        ("vi", "6"),
        ("vii", "7"),
        ("viii", "8"),
        ("ix", "9"),
        ("x", "10"),
        ("zero", "0"),
        ("one", "1"),
        ("two", "2"),
        ("three", "3"),
        ("four", "4"),
        ("five", "5"),
        ("six", "6"),
        ("seven", "7"),
        ("eight", "8"),
        ("nine", "9"),
        ("ten", "10"),
    ];
    pairs
        .iter()
        .map(|(w, d)| {
            let re = Regex::new(&format!(r"\b{w}\b")).expect("numeral regex");
            (re, *d)
        })
        .collect()
});

/// Lowercase, collapse everything that is not a letter/digit/space into a
/// space, squeeze whitespace, trim.
pub fn clean_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let depunct = RE_NON_ALNUM.replace_all(&lowered, " ");
    RE_WS.replace_all(&depunct, " ").trim().to_string()
}

fn map_numerals(s: &str) -> String {
    let mut out = s.to_string();
    for (re, digit) in NUMERALS.iter() {
        out = re.replace_all(&out, *digit).into_owned();
    }
    out
}

/// Canonical comparison form of a title.
///
/// HTML entities and stray tags are stripped first (source payloads are not
/// always clean), then: lowercase, punctuation to spaces, numerals to digits,
/// the word "part" dropped (sequels often differ only by it), whitespace
/// collapsed. Empty input normalizes to the empty string; never panics.
pub fn normalize_title(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let decoded = html_escape::decode_html_entities(raw);
    let untagged = RE_TAGS.replace_all(&decoded, " ");
    let cleaned = clean_text(&untagged);
    let mapped = map_numerals(&cleaned);
    let partless = RE_PART.replace_all(&mapped, " ");
    clean_text(&partless)
}

/// The standalone trailing number of a normalized title, if any
/// ("the godfather 2" -> "2").
pub fn extract_trailing_number(s: &str) -> Option<&str> {
    let last = s.rsplit(' ').next()?;
    if !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
        Some(last)
    } else {
        None
    }
}

const STOPWORDS: &[&str] = &["the", "a", "an", "of"];

/// Drop trivial stopwords from a token sequence, preserving order.
pub fn remove_stopwords<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    tokens
        .into_iter()
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .collect()
}

/// Robust variant set for fuzzy search: the raw title plus normalized forms
/// with digit/Roman swaps. Providers may fan a query out over these to widen
/// recall on catalogs that disagree about numeral style.
pub fn title_variants(title: &str) -> Vec<String> {
    static RE_TWO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b2\b").expect("variant regex"));
    static RE_THREE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b3\b").expect("variant regex"));

    let base = normalize_title(title);
    let candidates = [
        title.trim().to_string(),
        clean_text(title),
        base.clone(),
        RE_TWO.replace_all(&base, "ii").into_owned(),
        RE_THREE.replace_all(&base, "iii").into_owned(),
    ];

    let mut out: Vec<String> = Vec::new();
    for v in candidates {
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize_title("The Godfather!"), "the godfather");
        assert_eq!(
            normalize_title("  Lord of the Rings: Return! "),
            "lord of the rings return"
        );
    }

    #[test]
    fn maps_roman_and_word_numerals_as_whole_words() {
        assert_eq!(normalize_title("The Godfather Part II"), "the godfather 2");
        assert_eq!(normalize_title("The Godfather Part Two"), "the godfather 2");
        // "x" inside a word must not become "10"
        assert_eq!(normalize_title("Xanadu"), "xanadu");
        // "vii" is one word; the inner "ii" must not fire
        assert_eq!(normalize_title("Rocky VII"), "rocky 7");
    }

    #[test]
    fn drops_the_word_part() {
        assert_eq!(normalize_title("It Part 2"), "it 2");
        assert_eq!(normalize_title("It: Part II"), "it 2");
    }

    #[test]
    fn decodes_entities_and_strips_tags() {
        assert_eq!(normalize_title("Tom &amp; Jerry"), "tom jerry");
        assert_eq!(normalize_title("<b>Alien</b>"), "alien");
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!!"), "");
    }

    #[test]
    fn trailing_number_extraction() {
        assert_eq!(extract_trailing_number("the godfather 2"), Some("2"));
        assert_eq!(extract_trailing_number("se7en"), None);
        assert_eq!(extract_trailing_number(""), None);
    }

    #[test]
    fn stopwords_are_dropped_in_order() {
        let toks = remove_stopwords("the lord of the rings".split(' '));
        assert_eq!(toks, vec!["lord", "rings"]);
    }

    #[test]
    fn variants_are_deduped_and_non_empty() {
        let vs = title_variants("The Godfather Part II");
        assert!(vs.contains(&"the godfather 2".to_string()));
        assert!(vs.contains(&"the godfather ii".to_string()));
        let unique: std::collections::HashSet<_> = vs.iter().collect();
        assert_eq!(unique.len(), vs.len());
    }
}
