// src/lookup.rs
//! Lookup orchestration: the façade the service layer drives.
//!
//! The two rating sources run concurrently; the awards source either runs
//! after a canonical title has been resolved (`awaited`) or races the rating
//! lookups against a bounded grace period (`best-effort`). Per-source
//! failures never abort a lookup — they reduce the record to partial data,
//! because partial data is always preferable to total failure.

use anyhow::Result;
use metrics::counter;
use tracing::{info, warn};

use crate::config::{AwardsMode, CoreConfig};
use crate::decision::WatchDecision;
use crate::engine::compute_decision;
use crate::error::DecisionError;
use crate::normalize::title_variants;
use crate::prefs::PreferenceStore;
use crate::record::{AwardEntry, MovieRecord, SourceDetail, TitleCandidate};
use crate::resolve::{resolve_best, resolve_best_with_floor};
use crate::retry::{retry, with_timeout};
use crate::sources::types::{AwardSource, MovieSource};
use crate::sources::{ensure_metrics_described, merge_record};

/// Which external source a [`MovieLookup::resolve_title`] call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primary,
    Secondary,
    Awards,
}

pub struct MovieLookup {
    primary: Box<dyn MovieSource>,
    secondary: Box<dyn MovieSource>,
    awards: Box<dyn AwardSource>,
    cfg: CoreConfig,
}

impl MovieLookup {
    pub fn new(
        primary: Box<dyn MovieSource>,
        secondary: Box<dyn MovieSource>,
        awards: Box<dyn AwardSource>,
        cfg: CoreConfig,
    ) -> Self {
        ensure_metrics_described();
        Self {
            primary,
            secondary,
            awards,
            cfg,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Resolve the best candidate one source has for `title`, or `None`
    /// when the source has no data. The awards source additionally enforces
    /// the configured similarity floor.
    pub async fn resolve_title(
        &self,
        kind: SourceKind,
        title: &str,
    ) -> Result<Option<TitleCandidate>> {
        let policy = self.cfg.retry;
        let limit = self.cfg.lookup.search_timeout();

        let hits = match kind {
            SourceKind::Primary => {
                let name = self.primary.name();
                retry(name, policy, || {
                    with_timeout(name, limit, self.primary.search(title))
                })
                .await?
            }
            SourceKind::Secondary => {
                let name = self.secondary.name();
                retry(name, policy, || {
                    with_timeout(name, limit, self.secondary.search(title))
                })
                .await?
            }
            SourceKind::Awards => {
                let name = self.awards.name();
                retry(name, policy, || {
                    with_timeout(name, limit, self.awards.search_films(title))
                })
                .await?
            }
        };

        let resolved = match kind {
            SourceKind::Awards => {
                resolve_best_with_floor(title, &hits, self.cfg.lookup.min_award_similarity)
            }
            _ => resolve_best(title, &hits),
        };
        if resolved.is_none() {
            counter!("lookup_no_match_total").increment(1);
        }
        Ok(resolved)
    }

    /// Search, resolve, and fetch detail from one rating source.
    /// `Ok(None)` means no match; `Err` means the source is unavailable
    /// even after retries.
    ///
    /// An empty first response widens the query over numeral-style variants
    /// of the title before giving up — catalogs disagree about "Part II"
    /// versus "Part 2".
    async fn fetch_section(
        &self,
        source: &dyn MovieSource,
        title: &str,
    ) -> Result<Option<SourceDetail>> {
        let name = source.name();
        let policy = self.cfg.retry;

        let mut hits = retry(name, policy, || {
            with_timeout(name, self.cfg.lookup.search_timeout(), source.search(title))
        })
        .await?;

        if hits.is_empty() {
            for variant in title_variants(title).into_iter().filter(|v| v != title) {
                hits = retry(name, policy, || {
                    with_timeout(
                        name,
                        self.cfg.lookup.search_timeout(),
                        source.search(&variant),
                    )
                })
                .await?;
                if !hits.is_empty() {
                    info!(target: "lookup", source = name, %variant, "variant query matched");
                    break;
                }
            }
        }

        let Some(best) = resolve_best(title, &hits) else {
            counter!("lookup_no_match_total").increment(1);
            info!(target: "lookup", source = name, title, "no match");
            return Ok(None);
        };
        info!(
            target: "lookup",
            source = name,
            best = %best.title,
            similarity = best.similarity,
            "resolved candidate"
        );

        let detail = retry(name, policy, || {
            with_timeout(name, self.cfg.lookup.detail_timeout(), source.detail(&best))
        })
        .await?;
        Ok(Some(detail))
    }

    /// Film search + nominations. An empty list is the no-match outcome —
    /// including a best match under the similarity floor, since acting on an
    /// unrelated film's awards is worse than reporting none.
    async fn fetch_awards(&self, title: &str) -> Result<Vec<AwardEntry>> {
        let name = self.awards.name();
        let policy = self.cfg.retry;

        let hits = retry(name, policy, || {
            with_timeout(
                name,
                self.cfg.lookup.search_timeout(),
                self.awards.search_films(title),
            )
        })
        .await?;

        let Some(best) =
            resolve_best_with_floor(title, &hits, self.cfg.lookup.min_award_similarity)
        else {
            counter!("lookup_no_match_total").increment(1);
            info!(target: "lookup", source = name, title, "no film match above floor");
            return Ok(Vec::new());
        };

        retry(name, policy, || {
            with_timeout(
                name,
                self.cfg.lookup.detail_timeout(),
                self.awards.nominations(&best),
            )
        })
        .await
    }

    /// Build the reconciled record for one title. Never fails: every
    /// degraded source leaves its section empty.
    pub async fn build_movie_record(&self, title: &str) -> MovieRecord {
        let mut degraded = false;

        let (primary_res, secondary_res, raced_awards) = match self.cfg.lookup.awards_mode {
            AwardsMode::BestEffort => {
                // Awards race the rating lookups, searching by the raw
                // target title, bounded by the grace period from lookup
                // start. Expiry means the record ships without them.
                let (p, s, a) = tokio::join!(
                    self.fetch_section(self.primary.as_ref(), title),
                    self.fetch_section(self.secondary.as_ref(), title),
                    tokio::time::timeout(self.cfg.lookup.awards_grace(), self.fetch_awards(title)),
                );
                let awards = match a {
                    Ok(Ok(v)) => v,
                    Ok(Err(e)) => {
                        warn!(target: "lookup", error = %e, "awards source unavailable");
                        counter!("lookup_source_errors_total").increment(1);
                        degraded = true;
                        Vec::new()
                    }
                    Err(_) => {
                        warn!(target: "lookup", "awards grace period expired");
                        degraded = true;
                        Vec::new()
                    }
                };
                (p, s, Some(awards))
            }
            AwardsMode::Awaited => {
                let (p, s) = tokio::join!(
                    self.fetch_section(self.primary.as_ref(), title),
                    self.fetch_section(self.secondary.as_ref(), title),
                );
                (p, s, None)
            }
        };

        let mut settle = |res: Result<Option<SourceDetail>>, name: &str| match res {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    target: "lookup",
                    source = name,
                    error = %e,
                    "source unavailable, continuing with partial data"
                );
                counter!("lookup_source_errors_total").increment(1);
                degraded = true;
                None
            }
        };
        let primary = settle(primary_res, self.primary.name());
        let secondary = settle(secondary_res, self.secondary.name());

        let awards = match raced_awards {
            Some(v) => v,
            None => {
                // Awaited mode orders the awards lookup after partial
                // resolution: it searches by the canonical title of a
                // resolved rating source, falling back to the raw target.
                let canonical = primary
                    .as_ref()
                    .map(|d| d.title.as_str())
                    .or_else(|| secondary.as_ref().map(|d| d.title.as_str()))
                    .unwrap_or(title);
                match self.fetch_awards(canonical).await {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(target: "lookup", error = %e, "awards source unavailable");
                        counter!("lookup_source_errors_total").increment(1);
                        degraded = true;
                        Vec::new()
                    }
                }
            }
        };

        let record = merge_record(primary, secondary, awards);
        counter!("lookup_records_total").increment(1);
        if degraded {
            counter!("lookup_partial_total").increment(1);
        }
        if record.is_empty() {
            info!(target: "lookup", title, "no source returned data");
        }
        record
    }

    /// Full pipeline for one user and title.
    ///
    /// The preference store is read first: its failure is the one condition
    /// that aborts the computation, since without preferences the score has
    /// no meaningful basis. Everything downstream degrades gracefully.
    pub async fn decide(
        &self,
        store: &dyn PreferenceStore,
        user_id: &str,
        title: &str,
    ) -> Result<WatchDecision, DecisionError> {
        let prefs =
            store
                .load(user_id)
                .await
                .map_err(|source| DecisionError::PreferenceStore {
                    user: user_id.to_string(),
                    source,
                })?;

        let record = self.build_movie_record(title).await;
        Ok(compute_decision(&record, &prefs, &self.cfg.decision))
    }
}
