// src/config.rs
//! Runtime configuration: decision threshold, retry/backoff knobs, lookup
//! timeouts and the awards-enrichment mode.
//!
//! Historical iterations of this pipeline disagreed on several constants
//! (threshold 37 vs 53, 3 vs 4 retries, 1000 vs 1500 ms delays). They are
//! all named, file-configurable and env-overridable here instead of being
//! baked in.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::retry::RetryPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "config/reelscore.toml";
pub const ENV_CONFIG_PATH: &str = "REELSCORE_CONFIG_PATH";
pub const ENV_DECISION_THRESHOLD: &str = "REELSCORE_DECISION_THRESHOLD";

/// Default watch/skip cut. The stricter of the two observed values; tune via
/// `[decision].threshold` or the env override.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 53.0;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Minimum final score (0-100) for `should_watch`.
    pub threshold: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DECISION_THRESHOLD,
        }
    }
}

/// Whether a lookup waits for the awards source or treats it as best-effort
/// enrichment. An explicit choice, not a silently picked behavior: awaited
/// trades latency for completeness, best-effort returns without award data
/// when the grace period expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AwardsMode {
    Awaited,
    BestEffort,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-attempt bound on a source's search call.
    pub search_timeout_secs: u64,
    /// Per-attempt bound on a detail/nominations fetch.
    pub detail_timeout_secs: u64,
    pub awards_mode: AwardsMode,
    /// Best-effort only: how long the awards path may take before the
    /// lookup returns without it.
    pub awards_grace_ms: u64,
    /// Similarity floor for accepting an awards-section film match.
    pub min_award_similarity: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_timeout_secs: 30,
            detail_timeout_secs: 60,
            awards_mode: AwardsMode::Awaited,
            awards_grace_ms: 2_500,
            min_award_similarity: 0.5,
        }
    }
}

impl LookupConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_secs(self.detail_timeout_secs)
    }

    pub fn awards_grace(&self) -> Duration {
        Duration::from_millis(self.awards_grace_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub decision: DecisionConfig,
    pub retry: RetryPolicy,
    pub lookup: LookupConfig,
}

impl CoreConfig {
    /// Parse from a TOML string. Unknown keys are ignored, missing sections
    /// fall back to defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: CoreConfig = toml::from_str(toml_str).context("parsing core config")?;
        cfg.harden();
        Ok(cfg)
    }

    /// Load using `REELSCORE_CONFIG_PATH` or the default path. A missing
    /// default file means defaults; a missing explicit file is an error.
    /// `REELSCORE_DECISION_THRESHOLD` overrides the file value.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("reading config from {}", path.display()))?;
                Self::from_toml_str(&content)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    let content = fs::read_to_string(&path)
                        .with_context(|| format!("reading config from {}", path.display()))?;
                    Self::from_toml_str(&content)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_DECISION_THRESHOLD).ok()) {
            cfg.decision.threshold = t;
        }
        cfg.harden();
        Ok(cfg)
    }

    /// Keep odd inputs sane: non-finite thresholds fall back to the default,
    /// everything else clamps to its domain.
    fn harden(&mut self) {
        if !self.decision.threshold.is_finite() {
            self.decision.threshold = DEFAULT_DECISION_THRESHOLD;
        }
        self.decision.threshold = self.decision.threshold.clamp(0.0, 100.0);
        self.lookup.min_award_similarity = self.lookup.min_award_similarity.clamp(0.0, 1.0);
    }
}

// parse optional float env and clamp to the 0..=100 score domain
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(|v| v.clamp(0.0, 100.0))
}
