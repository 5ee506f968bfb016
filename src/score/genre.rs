// src/score/genre.rs
//! Genre contribution in `[0, max_scale]`.
//!
//! A movie strongly matching several favorite genres is boosted beyond the
//! plain average; even one disliked genre pulls the score down regardless of
//! the rest. Genres the user never rated are excluded from the match set —
//! unless nothing matches at all, in which case the result is the neutral
//! midpoint rather than 0 (an unrated movie is not an actively disliked
//! one).

use crate::prefs::{PreferenceMap, NEUTRAL_PREFERENCE};

/// Multi-genre synergy: strong when at least two genres match and their
/// average tops 7, mild otherwise.
const STRONG_SYNERGY: f64 = 1.1;
const MILD_SYNERGY: f64 = 1.03;
/// Penalty when any matched preference sits at 3 or below. Stacks with the
/// synergy multiplier.
const DISLIKE_PENALTY: f64 = 0.85;
const DISLIKE_CUTOFF: f64 = 3.0;
/// The preference domain; adjusted values are clamped here before scaling.
const SCALE_TOP: f64 = 10.0;

pub fn genre_score(movie_genres: &[String], prefs: &PreferenceMap, max_scale: f64) -> f64 {
    if movie_genres.is_empty() {
        return 0.0;
    }

    let matched: Vec<f64> = movie_genres
        .iter()
        .filter_map(|g| prefs.get_explicit(g))
        .collect();

    if matched.is_empty() {
        return NEUTRAL_PREFERENCE / SCALE_TOP * max_scale;
    }

    let base_average = matched.iter().sum::<f64>() / matched.len() as f64;

    let synergy = if matched.len() >= 2 && base_average > 7.0 {
        STRONG_SYNERGY
    } else if matched.len() >= 2 {
        MILD_SYNERGY
    } else {
        1.0
    };

    let penalty = if matched.iter().any(|&p| p <= DISLIKE_CUTOFF) {
        DISLIKE_PENALTY
    } else {
        1.0
    };

    let adjusted = (base_average * synergy * penalty).min(SCALE_TOP);
    adjusted / SCALE_TOP * max_scale
}
