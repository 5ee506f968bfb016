// tests/lookup_pipeline.rs
// End-to-end lookup behavior with stub sources: merging, degradation to
// partial data, the awards similarity floor, both awards modes, and the
// preference-store failure path.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use reelscore::config::{AwardsMode, CoreConfig};
use reelscore::lookup::{MovieLookup, SourceKind};
use reelscore::prefs::{PreferenceStore, UserPreferences};
use reelscore::record::{AwardEntry, RawSearchHit, SourceDetail, TitleCandidate};
use reelscore::retry::RetryPolicy;
use reelscore::sources::types::{AwardSource, MovieSource};
use reelscore::DecisionError;

fn test_cfg() -> CoreConfig {
    let mut cfg = CoreConfig::default();
    cfg.retry = RetryPolicy {
        retries: 2,
        delay_ms: 1,
        factor: 2.0,
        jitter: false,
    };
    cfg
}

fn hit(title: &str, url: &str) -> RawSearchHit {
    RawSearchHit {
        title: title.to_string(),
        url: url.to_string(),
        year_hint: None,
    }
}

struct StubMovieSource {
    name: &'static str,
    hits: Vec<RawSearchHit>,
    detail: Option<SourceDetail>,
    broken: bool,
}

impl StubMovieSource {
    fn working(name: &'static str, hits: Vec<RawSearchHit>, detail: SourceDetail) -> Self {
        Self {
            name,
            hits,
            detail: Some(detail),
            broken: false,
        }
    }

    fn empty(name: &'static str) -> Self {
        Self {
            name,
            hits: Vec::new(),
            detail: None,
            broken: false,
        }
    }

    fn broken(name: &'static str) -> Self {
        Self {
            name,
            hits: Vec::new(),
            detail: None,
            broken: true,
        }
    }
}

#[async_trait]
impl MovieSource for StubMovieSource {
    async fn search(&self, _title: &str) -> Result<Vec<RawSearchHit>> {
        if self.broken {
            return Err(anyhow!("{} is down", self.name));
        }
        Ok(self.hits.clone())
    }

    async fn detail(&self, _candidate: &TitleCandidate) -> Result<SourceDetail> {
        self.detail
            .clone()
            .ok_or_else(|| anyhow!("{} has no detail", self.name))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

struct StubAwardSource {
    films: Vec<RawSearchHit>,
    entries: Vec<AwardEntry>,
    delay_ms: u64,
}

#[async_trait]
impl AwardSource for StubAwardSource {
    async fn search_films(&self, _title: &str) -> Result<Vec<RawSearchHit>> {
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        Ok(self.films.clone())
    }

    async fn nominations(&self, _candidate: &TitleCandidate) -> Result<Vec<AwardEntry>> {
        Ok(self.entries.clone())
    }

    fn name(&self) -> &'static str {
        "stub-awards"
    }
}

fn heat_primary() -> StubMovieSource {
    StubMovieSource::working(
        "stub-primary",
        vec![hit("Heat", "/imdb/heat")],
        SourceDetail {
            title: "Heat".into(),
            rating: Some(8.3),
            genres: vec!["Action".into(), "Crime".into(), "Drama".into()],
            url: "/imdb/heat".into(),
            ..Default::default()
        },
    )
}

fn heat_secondary() -> StubMovieSource {
    StubMovieSource::working(
        "stub-secondary",
        vec![hit("Heat", "/rt/heat")],
        SourceDetail {
            title: "Heat".into(),
            critic_score: Some(88.0),
            audience_score: Some(94.0),
            genres: vec!["Crime".into(), "Mystery & Thriller".into()],
            url: "/rt/heat".into(),
            ..Default::default()
        },
    )
}

fn heat_awards() -> StubAwardSource {
    StubAwardSource {
        films: vec![hit("Heat", "/awards/heat")],
        entries: vec![AwardEntry::from_raw("BEST PICTURE", None, false)],
        delay_ms: 0,
    }
}

struct NeutralStore;

#[async_trait]
impl PreferenceStore for NeutralStore {
    async fn load(&self, _user_id: &str) -> Result<UserPreferences> {
        Ok(UserPreferences::neutral())
    }
}

struct BrokenStore;

#[async_trait]
impl PreferenceStore for BrokenStore {
    async fn load(&self, _user_id: &str) -> Result<UserPreferences> {
        Err(anyhow!("connection refused"))
    }
}

#[tokio::test]
async fn merges_all_sources_into_one_record() {
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(heat_secondary()),
        Box::new(heat_awards()),
        test_cfg(),
    );

    let record = lookup.build_movie_record("Heat").await;
    assert_eq!(record.primary.as_ref().unwrap().rating, Some(8.3));
    assert_eq!(record.secondary.as_ref().unwrap().critic_score, Some(88.0));
    assert_eq!(record.awards.len(), 1);
    // union of both genre lists, normalized and deduped
    assert_eq!(
        record.genres,
        vec!["Action", "Crime", "Drama", "Mystery & Thriller"]
    );
}

#[tokio::test]
async fn no_match_anywhere_degrades_to_minimum_score() {
    let lookup = MovieLookup::new(
        Box::new(StubMovieSource::empty("stub-primary")),
        Box::new(StubMovieSource::empty("stub-secondary")),
        Box::new(StubAwardSource {
            films: Vec::new(),
            entries: Vec::new(),
            delay_ms: 0,
        }),
        test_cfg(),
    );

    let record = lookup.build_movie_record("Unknown Title").await;
    assert!(record.is_empty());

    let decision = lookup
        .decide(&NeutralStore, "u1", "Unknown Title")
        .await
        .unwrap();
    assert_eq!(decision.final_score, 0.0);
    assert!(!decision.should_watch);
}

#[tokio::test(start_paused = true)]
async fn broken_source_reduces_to_partial_data() {
    let lookup = MovieLookup::new(
        Box::new(StubMovieSource::broken("stub-primary")),
        Box::new(heat_secondary()),
        Box::new(heat_awards()),
        test_cfg(),
    );

    let record = lookup.build_movie_record("Heat").await;
    assert!(record.primary.is_none(), "broken source degrades to None");
    assert!(record.secondary.is_some(), "healthy source still resolves");
    assert!(!record.awards.is_empty());
}

#[tokio::test]
async fn awards_below_similarity_floor_are_dropped() {
    let awards = StubAwardSource {
        films: vec![hit("A Completely Different Film", "/awards/other")],
        entries: vec![AwardEntry::from_raw("BEST PICTURE", None, true)],
        delay_ms: 0,
    };
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(heat_secondary()),
        Box::new(awards),
        test_cfg(),
    );

    let record = lookup.build_movie_record("Heat").await;
    assert!(
        record.awards.is_empty(),
        "an unrelated film's awards must not attach"
    );
}

#[tokio::test(start_paused = true)]
async fn best_effort_mode_ships_without_slow_awards() {
    let mut cfg = test_cfg();
    cfg.lookup.awards_mode = AwardsMode::BestEffort;
    cfg.lookup.awards_grace_ms = 50;

    let slow_awards = StubAwardSource {
        films: vec![hit("Heat", "/awards/heat")],
        entries: vec![AwardEntry::from_raw("BEST PICTURE", None, true)],
        delay_ms: 60_000,
    };
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(heat_secondary()),
        Box::new(slow_awards),
        cfg,
    );

    let record = lookup.build_movie_record("Heat").await;
    assert!(record.primary.is_some());
    assert!(
        record.awards.is_empty(),
        "grace expiry returns the record without awards"
    );
}

#[tokio::test]
async fn resolve_title_honors_source_kind() {
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(StubMovieSource::empty("stub-secondary")),
        Box::new(heat_awards()),
        test_cfg(),
    );

    let primary = lookup
        .resolve_title(SourceKind::Primary, "Heat")
        .await
        .unwrap();
    assert_eq!(primary.unwrap().url, "/imdb/heat");

    let secondary = lookup
        .resolve_title(SourceKind::Secondary, "Heat")
        .await
        .unwrap();
    assert!(secondary.is_none(), "empty candidate list is a no-match");
}

#[tokio::test]
async fn preference_store_outage_aborts_the_decision() {
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(heat_secondary()),
        Box::new(heat_awards()),
        test_cfg(),
    );

    let err = lookup.decide(&BrokenStore, "u1", "Heat").await.unwrap_err();
    match err {
        DecisionError::PreferenceStore { user, .. } => assert_eq!(user, "u1"),
    }
}

#[tokio::test]
async fn decision_uses_resolved_signals() {
    let lookup = MovieLookup::new(
        Box::new(heat_primary()),
        Box::new(heat_secondary()),
        Box::new(heat_awards()),
        test_cfg(),
    );

    let decision = lookup.decide(&NeutralStore, "u1", "Heat").await.unwrap();
    assert!(decision.final_score > 0.0);
    assert!(decision.final_score <= 100.0);
    assert_eq!(decision.threshold, 53.0);
}
