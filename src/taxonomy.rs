// src/taxonomy.rs
//! Canonical taxonomies: award-ceremony category phrasing and genre labels.
//!
//! Both tables are many-to-one aggregation points ("SOUND MIXING" and
//! "SOUND EDITING" both land on "Best Sound"). Unmapped labels pass through
//! unchanged so that new or rare categories degrade to "uncategorized but
//! still counted" rather than being dropped.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static AWARD_CATEGORIES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    let raw = include_str!("award_categories.json");
    serde_json::from_str::<HashMap<String, String>>(raw).expect("valid award category table")
});

/// Map a raw award-category label onto its canonical short name.
/// Lookup is by uppercase; unmapped labels come back unchanged.
pub fn normalize_award_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match AWARD_CATEGORIES.get(&trimmed.to_uppercase()) {
        Some(canonical) => canonical.clone(),
        None => trimmed.to_string(),
    }
}

/// Genre alias table: noisy per-source labels onto one canonical vocabulary.
static GENRE_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (k, v) in [
        ("Kids", "Kids & Family"),
        ("Kids & Family", "Kids & Family"),
        ("Mystery", "Mystery & Thriller"),
        ("Thriller", "Mystery & Thriller"),
        ("Mystery & Thriller", "Mystery & Thriller"),
        ("Science Fiction", "Sci-Fi"),
        ("Sci-Fi", "Sci-Fi"),
        ("Music", "Music"),
        ("Musical", "Musical"),
    ] {
        m.insert(k, v);
    }
    m
});

/// Qualifiers some catalogs prepend to genres ("Epic Western",
/// "Psychological Thriller") that carry no taxonomy meaning of their own.
static RE_QUALIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Epic|Psychological)\b").expect("qualifier regex"));

/// Canonicalize one raw genre string into zero or more canonical names.
///
/// Sources disagree on packing: "Mystery & Thriller" is one genre to one
/// site and "Mystery, Thriller" two to another, so we strip qualifiers,
/// split on `,`/`&`, and map each piece through the alias table. Pieces the
/// table does not know pass through unchanged.
pub fn normalize_genre(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let stripped = RE_QUALIFIERS.replace_all(raw, "");
    stripped
        .split([',', '&'])
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(|g| match GENRE_ALIASES.get(g) {
            Some(canonical) => canonical.to_string(),
            None => g.to_string(),
        })
        .collect()
}
