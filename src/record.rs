// src/record.rs
//! Data model for the resolution pipeline: raw search rows, resolved
//! candidates, per-source detail, award entries, and the merged record.

use serde::{Deserialize, Serialize};

use crate::taxonomy::normalize_award_category;

/// One raw row from a source's search response, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchHit {
    pub title: String,
    pub url: String,
    /// Release year as the source printed it, e.g. "2010".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_hint: Option<String>,
}

/// The winner of candidate resolution for one source. Transient: created per
/// search response, consumed to drive the detail fetch, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub title: String,
    pub url: String,
    /// Raw similarity against the target, without tie-break bonuses.
    pub similarity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_hint: Option<String>,
}

/// One source's normalized view of a movie. Every adapter fills the fields
/// its source actually has and leaves the rest `None`/empty — this is the
/// single sub-shape all response variants collapse into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDetail {
    pub title: String,
    /// Aggregate rating on a 0-10 scale (review-aggregator style).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Critic score in percent, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critic_score: Option<f64>,
    /// Audience score in percent, 0-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub url: String,
}

/// A single nomination or win.
///
/// `normalized_category` is never empty: unmapped labels pass through
/// unchanged, so new/rare categories degrade to "uncategorized but still
/// counted" instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub original_category: String,
    pub normalized_category: String,
    pub full_category: String,
    pub is_win: bool,
}

impl AwardEntry {
    /// Build an entry from a raw awards-table row.
    pub fn from_raw(category: &str, statement: Option<&str>, is_win: bool) -> Self {
        let full_category = match statement.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => format!("{category} - {s}"),
            None => category.to_string(),
        };
        Self {
            original_category: category.to_string(),
            normalized_category: normalize_award_category(category),
            full_category,
            is_win,
        }
    }

    /// The category key used for grouping. Falls back to re-normalizing the
    /// original label for entries deserialized from older payloads.
    pub fn category_key(&self) -> String {
        if self.normalized_category.is_empty() {
            normalize_award_category(&self.original_category)
        } else {
            self.normalized_category.clone()
        }
    }
}

/// The reconciled view of one title across all sources. Built once per
/// lookup; caching (if any) is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<SourceDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<SourceDetail>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<AwardEntry>,
    /// Deduplicated, normalized union of all per-source genre lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

impl MovieRecord {
    /// True when no source produced anything — the "we could not find enough
    /// data about this title" case the service layer reports.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
            && self.secondary.is_none()
            && self.awards.is_empty()
            && self.genres.is_empty()
    }
}
