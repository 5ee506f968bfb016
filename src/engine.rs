// src/engine.rs
//! # Decision Aggregator
//! Pure, testable logic that maps `(MovieRecord, UserPreferences)` to a
//! `WatchDecision`. No I/O, suitable for unit tests and offline evaluation.
//!
//! Stage 1 distributes weight across the three sections from the user's own
//! preference averages, so sections the user cares about automatically pull
//! more of the final number. Stage 2 scores each section; the rating blend
//! honors per-source preferences inside the section. Missing movie signals
//! contribute 0 to their slice; missing preferences read as the neutral 5.
//! This function never fails on missing data.

use tracing::debug;

use crate::config::DecisionConfig;
use crate::decision::{ScoreBreakdown, SectionScore, WatchDecision};
use crate::prefs::{
    UserPreferences, PREF_AUDIENCE_SCORE, PREF_CRITIC_SCORE, PREF_PRIMARY_RATING,
};
use crate::record::MovieRecord;
use crate::score::{award_score, genre_score};

pub fn compute_decision(
    record: &MovieRecord,
    prefs: &UserPreferences,
    cfg: &DecisionConfig,
) -> WatchDecision {
    // --- Stage 1: section weights from preference averages ---
    let p_primary = prefs.ratings.get(PREF_PRIMARY_RATING);
    let p_critic = prefs.ratings.get(PREF_CRITIC_SCORE);
    let p_audience = prefs.ratings.get(PREF_AUDIENCE_SCORE);

    let avg_rating_pref = (p_primary + p_critic + p_audience) / 3.0;
    let avg_genre_pref = prefs.genres.average();
    let award_importance = prefs
        .award_importance
        .unwrap_or_else(|| prefs.awards.average());

    let total_weight = avg_rating_pref + avg_genre_pref + award_importance;
    let (rating_weight, genre_weight, award_weight) = if total_weight > 0.0 {
        (
            avg_rating_pref / total_weight,
            avg_genre_pref / total_weight,
            award_importance / total_weight,
        )
    } else {
        (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    };

    debug!(
        target: "engine",
        rating_weight, genre_weight, award_weight,
        "section weights"
    );

    // --- Stage 2: section scores ---

    // Ratings: each signal normalized to 0-10, blended by its own
    // preference. A missing signal contributes 0 to the numerator while its
    // preference stays in the denominator.
    let primary_norm = record
        .primary
        .as_ref()
        .and_then(|d| d.rating)
        .unwrap_or(0.0)
        .clamp(0.0, 10.0);
    let critic_norm = record
        .secondary
        .as_ref()
        .and_then(|d| d.critic_score)
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
        / 10.0;
    let audience_norm = record
        .secondary
        .as_ref()
        .and_then(|d| d.audience_score)
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
        / 10.0;

    let rating_pref_total = p_primary + p_critic + p_audience;
    let raw_rating = if rating_pref_total > 0.0 {
        (primary_norm * p_primary + critic_norm * p_critic + audience_norm * p_audience)
            / rating_pref_total
    } else {
        0.0
    };
    let rating_contribution = raw_rating * rating_weight * 10.0;

    let genre_contribution = genre_score(&record.genres, &prefs.genres, genre_weight * 100.0);
    let award_contribution = award_score(&record.awards, &prefs.awards, award_weight * 100.0);

    let final_score =
        (rating_contribution + genre_contribution + award_contribution).min(100.0);

    debug!(
        target: "engine",
        rating_contribution, genre_contribution, award_contribution, final_score,
        "final score"
    );

    let breakdown = ScoreBreakdown {
        ratings: SectionScore::new(rating_weight, rating_contribution),
        genres: SectionScore::new(genre_weight, genre_contribution),
        awards: SectionScore::new(award_weight, award_contribution),
    };

    let mut decision = WatchDecision::new(final_score, cfg.threshold, breakdown)
        .with_reason(format!(
            "Ratings: {rating_contribution:.1} pts at {:.0}% weight",
            rating_weight * 100.0
        ))
        .with_reason(format!(
            "Genres: {genre_contribution:.1} pts at {:.0}% weight",
            genre_weight * 100.0
        ))
        .with_reason(format!(
            "Awards: {award_contribution:.1} pts at {:.0}% weight",
            award_weight * 100.0
        ));
    if record.is_empty() {
        decision = decision.with_reason("No source data resolved; score reflects defaults only");
    }
    decision
}
