// src/sources/providers/scorecard.rs
//! Secondary source: the critic/audience score site.
//!
//! The site has shipped two payload shapes over time — the current
//! "scorecard" object with percent strings and the legacy "scoreboard"
//! object with bare numbers. Both deserialize through one untagged enum and
//! collapse into the same `SourceDetail`, so callers never see which shape a
//! given title happened to return.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::record::{RawSearchHit, SourceDetail, TitleCandidate};
use crate::sources::types::MovieSource;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    results: Vec<SearchRow>,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    title: String,
    url: String,
    #[serde(default)]
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailEnvelope {
    Modern { scorecard: ModernScorecard },
    Legacy { scoreboard: LegacyScoreboard },
}

#[derive(Debug, Deserialize)]
struct ModernScorecard {
    title: String,
    #[serde(default, rename = "criticsScore")]
    critics_score: Option<String>,
    #[serde(default, rename = "audienceScore")]
    audience_score: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default, rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(default, rename = "posterImage")]
    poster_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyScoreboard {
    title: String,
    #[serde(default, rename = "tomatometerscore")]
    tomatometer_score: Option<f64>,
    #[serde(default, rename = "audiencescore")]
    audience_score: Option<f64>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default, rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(default, rename = "posterImage")]
    poster_image: Option<String>,
}

enum Transport {
    Http {
        client: reqwest::Client,
        base_url: String,
    },
    Fixture {
        search_json: String,
        detail_json: String,
    },
}

pub struct ScorecardProvider {
    transport: Transport,
}

impl ScorecardProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building scorecard http client")?;
        Ok(Self {
            transport: Transport::Http {
                client,
                base_url: base_url.into(),
            },
        })
    }

    pub fn from_fixture(search_json: &str, detail_json: &str) -> Self {
        Self {
            transport: Transport::Fixture {
                search_json: search_json.to_string(),
                detail_json: detail_json.to_string(),
            },
        }
    }

    async fn search_payload(&self, title: &str) -> Result<String> {
        match &self.transport {
            Transport::Http { client, base_url } => {
                let resp = client
                    .get(format!("{base_url}/search"))
                    .query(&[("q", title)])
                    .send()
                    .await
                    .context("scorecard search request")?
                    .error_for_status()
                    .context("scorecard search status")?;
                resp.text().await.context("scorecard search body")
            }
            Transport::Fixture { search_json, .. } => Ok(search_json.clone()),
        }
    }

    async fn detail_payload(&self, path: &str) -> Result<String> {
        match &self.transport {
            Transport::Http { client, base_url } => {
                let resp = client
                    .get(format!("{base_url}{path}"))
                    .send()
                    .await
                    .context("scorecard detail request")?
                    .error_for_status()
                    .context("scorecard detail status")?;
                resp.text().await.context("scorecard detail body")
            }
            Transport::Fixture { detail_json, .. } => Ok(detail_json.clone()),
        }
    }
}

/// Lenient percent parsing: "96%", "96", " 96 % " all come back as 96.0.
fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

impl DetailEnvelope {
    fn into_detail(self, url: String) -> SourceDetail {
        match self {
            DetailEnvelope::Modern { scorecard } => SourceDetail {
                title: scorecard.title,
                critic_score: scorecard.critics_score.as_deref().and_then(parse_percent),
                audience_score: scorecard.audience_score.as_deref().and_then(parse_percent),
                genres: scorecard.genres,
                release_date: scorecard.release_date,
                image: scorecard.poster_image,
                url,
                ..Default::default()
            },
            DetailEnvelope::Legacy { scoreboard } => SourceDetail {
                title: scoreboard.title,
                critic_score: scoreboard.tomatometer_score,
                audience_score: scoreboard.audience_score,
                genres: scoreboard.genres,
                release_date: scoreboard.release_date,
                image: scoreboard.poster_image,
                url,
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl MovieSource for ScorecardProvider {
    async fn search(&self, title: &str) -> Result<Vec<RawSearchHit>> {
        let payload = self.search_payload(title).await?;

        let t0 = std::time::Instant::now();
        let env: SearchEnvelope =
            serde_json::from_str(&payload).context("parsing scorecard search response")?;
        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("lookup_candidates_total").increment(env.results.len() as u64);

        Ok(env
            .results
            .into_iter()
            .map(|row| RawSearchHit {
                title: row.title,
                url: row.url,
                year_hint: row.year.filter(|y| !y.is_empty()),
            })
            .collect())
    }

    async fn detail(&self, candidate: &TitleCandidate) -> Result<SourceDetail> {
        let payload = self.detail_payload(&candidate.url).await?;
        let env: DetailEnvelope =
            serde_json::from_str(&payload).context("parsing scorecard detail response")?;
        Ok(env.into_detail(candidate.url.clone()))
    }

    fn name(&self) -> &'static str {
        "scorecard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"{
        "results": [
            {"title": "The Godfather, Part II", "url": "/m/godfather_part_ii", "year": "1974"},
            {"title": "The Godfather", "url": "/m/godfather", "year": "1972"}
        ]
    }"#;

    const MODERN: &str = r#"{
        "scorecard": {
            "title": "The Godfather, Part II",
            "criticsScore": "96%",
            "audienceScore": "97%",
            "genres": ["Crime", "Drama"],
            "releaseDate": "Dec 20, 1974",
            "posterImage": "https://img.example/g2.jpg"
        }
    }"#;

    const LEGACY: &str = r#"{
        "scoreboard": {
            "title": "The Godfather, Part II",
            "tomatometerscore": 96,
            "audiencescore": 97,
            "genres": ["Crime", "Drama"]
        }
    }"#;

    fn candidate() -> TitleCandidate {
        TitleCandidate {
            title: "The Godfather, Part II".into(),
            url: "/m/godfather_part_ii".into(),
            similarity: 1.0,
            year_hint: Some("1974".into()),
        }
    }

    #[tokio::test]
    async fn parses_search_rows() {
        let p = ScorecardProvider::from_fixture(SEARCH, MODERN);
        let hits = p.search("The Godfather Part II").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "/m/godfather_part_ii");
    }

    #[tokio::test]
    async fn modern_shape_parses_percent_strings() {
        let p = ScorecardProvider::from_fixture(SEARCH, MODERN);
        let d = p.detail(&candidate()).await.unwrap();
        assert_eq!(d.critic_score, Some(96.0));
        assert_eq!(d.audience_score, Some(97.0));
        assert_eq!(d.genres, vec!["Crime", "Drama"]);
        assert_eq!(d.rating, None);
    }

    #[tokio::test]
    async fn legacy_shape_normalizes_to_the_same_detail() {
        let modern = ScorecardProvider::from_fixture(SEARCH, MODERN);
        let legacy = ScorecardProvider::from_fixture(SEARCH, LEGACY);
        let m = modern.detail(&candidate()).await.unwrap();
        let l = legacy.detail(&candidate()).await.unwrap();
        assert_eq!(m.critic_score, l.critic_score);
        assert_eq!(m.audience_score, l.audience_score);
        assert_eq!(m.genres, l.genres);
    }

    #[test]
    fn percent_parsing_is_lenient() {
        assert_eq!(parse_percent("96%"), Some(96.0));
        assert_eq!(parse_percent(" 96 % "), Some(96.0));
        assert_eq!(parse_percent("96"), Some(96.0));
        assert_eq!(parse_percent("--"), None);
    }

    #[tokio::test]
    async fn empty_results_mean_no_match() {
        let p = ScorecardProvider::from_fixture(r#"{"results": []}"#, MODERN);
        assert!(p.search("Nothing").await.unwrap().is_empty());
    }
}
