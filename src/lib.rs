// src/lib.rs
// Public library surface for the service layer and integration tests.

pub mod cache;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod prefs;
pub mod record;
pub mod resolve;
pub mod retry;
pub mod similarity;
pub mod taxonomy;

// Section score engines (genre + award contributions)
pub mod score;

// Source adapters and the merge pipeline
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::decision::{ScoreBreakdown, SectionScore, WatchDecision};
pub use crate::engine::compute_decision;
pub use crate::error::DecisionError;
pub use crate::lookup::{MovieLookup, SourceKind};
pub use crate::prefs::{PreferenceMap, PreferenceStore, UserPreferences};
pub use crate::record::{AwardEntry, MovieRecord, RawSearchHit, SourceDetail, TitleCandidate};
pub use crate::retry::{retry, RetryPolicy};
pub use crate::similarity::similarity;
