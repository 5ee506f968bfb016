// src/score/award.rs
//! Award contribution in `[0, weight]`.
//!
//! A win counts fully, a nomination at 0.7 — recognition short of winning
//! still signals quality. Entries accumulate per normalized category, which
//! rewards movies dominant in a category the user cares about; the final
//! min-clamp keeps a single stacked category from running the score past
//! 100%.

use std::collections::BTreeMap;

use crate::prefs::PreferenceMap;
use crate::record::AwardEntry;

const WIN_WEIGHT: f64 = 1.0;
const NOMINATION_WEIGHT: f64 = 0.7;

pub fn award_score(movie_awards: &[AwardEntry], prefs: &PreferenceMap, weight: f64) -> f64 {
    if movie_awards.is_empty() {
        return 0.0;
    }

    // Per-category accumulation; the nomination weight applies per entry,
    // before normalization.
    let mut contributions: BTreeMap<String, f64> = BTreeMap::new();
    for entry in movie_awards {
        let category = entry.category_key();
        let pref = prefs.get(&category);
        let outcome = if entry.is_win {
            WIN_WEIGHT
        } else {
            NOMINATION_WEIGHT
        };
        *contributions.entry(category).or_insert(0.0) += pref * outcome;
    }

    let raw_score: f64 = contributions.values().sum();
    let total_pref: f64 = contributions.keys().map(|c| prefs.get(c)).sum();
    if total_pref <= 0.0 {
        return 0.0;
    }

    let normalized_percent = (raw_score / total_pref * 100.0).min(100.0);
    normalized_percent / 100.0 * weight
}
