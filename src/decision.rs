// src/decision.rs
//! Output types for the watch decision: final bounded score, binary verdict,
//! per-section breakdown, and human-readable reasons for explainability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One section's slice of the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionScore {
    /// Share of the total weight this section received, in [0,1].
    pub weight: f64,
    /// Points contributed to the final 0-100 score.
    pub contribution: f64,
}

impl SectionScore {
    pub fn new(weight: f64, contribution: f64) -> Self {
        Self {
            weight: clamp01(weight),
            contribution: contribution.clamp(0.0, 100.0),
        }
    }
}

/// The three signal groups the aggregator weighs and combines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub ratings: SectionScore,
    pub genres: SectionScore,
    pub awards: SectionScore,
}

/// Complete decision, the shape handed back to the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchDecision {
    /// Final score, clamped to [0,100].
    pub final_score: f64,
    pub should_watch: bool,
    /// The threshold the verdict was taken against (configurable).
    pub threshold: f64,
    pub breakdown: ScoreBreakdown,
    /// Short, user-facing explanations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    #[serde(rename = "ts")]
    pub generated_at: DateTime<Utc>,
}

impl WatchDecision {
    pub fn new(final_score: f64, threshold: f64, breakdown: ScoreBreakdown) -> Self {
        let final_score = final_score.clamp(0.0, 100.0);
        Self {
            final_score,
            should_watch: final_score >= threshold,
            threshold,
            breakdown,
            reasons: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Append one reason (builder style).
    pub fn with_reason(mut self, message: impl Into<String>) -> Self {
        self.reasons.push(message.into());
        self
    }
}

pub(crate) fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
