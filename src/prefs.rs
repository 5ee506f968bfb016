// src/prefs.rs
//! User preferences feeding the decision aggregator.
//!
//! A preference is an integer-ish weight in [1,10]. Anything the user never
//! rated reads back as the neutral default 5 — consistently, everywhere a
//! preference is looked up; a missing entry is never treated as 0.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Assumed preference for any dimension the user has not explicitly rated.
pub const NEUTRAL_PREFERENCE: f64 = 5.0;

/// Canonical keys of the three rating-source preferences.
pub const PREF_PRIMARY_RATING: &str = "imdb";
pub const PREF_CRITIC_SCORE: &str = "critic";
pub const PREF_AUDIENCE_SCORE: &str = "audience";

/// Canonical name -> preference in [1,10]. Stored sparsely: only explicit
/// ratings live here, which lets the genre engine distinguish "unrated"
/// from "rated 5".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceMap {
    inner: HashMap<String, f64>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an explicit preference, clamped into [1,10].
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.inner.insert(name.into(), value.clamp(1.0, 10.0));
    }

    /// Preference with the neutral default applied.
    pub fn get(&self, name: &str) -> f64 {
        self.inner
            .get(name)
            .copied()
            .unwrap_or(NEUTRAL_PREFERENCE)
    }

    /// Only explicit preferences; `None` means the user never rated this.
    pub fn get_explicit(&self, name: &str) -> Option<f64> {
        self.inner.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Mean of the stored preferences; neutral when nothing is stored.
    pub fn average(&self) -> f64 {
        if self.inner.is_empty() {
            return NEUTRAL_PREFERENCE;
        }
        self.inner.values().sum::<f64>() / self.inner.len() as f64
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PreferenceMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

/// Everything the aggregator needs about one user. A missing map means
/// "default 5 for everything", not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub ratings: PreferenceMap,
    #[serde(default)]
    pub genres: PreferenceMap,
    #[serde(default)]
    pub awards: PreferenceMap,
    /// Overall "Oscar importance" scalar. When absent the aggregator falls
    /// back to the average of the stored award preferences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub award_importance: Option<f64>,
}

impl UserPreferences {
    /// All-neutral preferences: empty maps, so every lookup defaults to 5.
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// The persistence collaborator. A failing load is the one condition that
/// aborts a decision outright — see `DecisionError::PreferenceStore`.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<UserPreferences>;
}
