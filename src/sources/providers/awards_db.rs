// src/sources/providers/awards_db.rs
//! Awards database: film search plus the nomination rows of one film.
//!
//! Rows arrive as `{category, outcome}` where the outcome text leads with
//! "Winner:" or "Nominee:". Category labels are normalized through the
//! taxonomy on entry construction; the resolver's similarity floor for this
//! source lives in the lookup layer.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::record::{AwardEntry, RawSearchHit, TitleCandidate};
use crate::sources::types::AwardSource;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

static RE_OUTCOME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(winner|nominee):\s*").expect("outcome regex"));

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    films: Vec<FilmRow>,
}

#[derive(Debug, Deserialize)]
struct FilmRow {
    title: String,
    url: String,
    #[serde(default)]
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominationsEnvelope {
    #[serde(default)]
    nominations: Vec<NominationRow>,
}

#[derive(Debug, Deserialize)]
struct NominationRow {
    category: String,
    outcome: String,
}

enum Transport {
    Http {
        client: reqwest::Client,
        base_url: String,
    },
    Fixture {
        search_json: String,
        nominations_json: String,
    },
}

pub struct AwardsDbProvider {
    transport: Transport,
}

impl AwardsDbProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building awards http client")?;
        Ok(Self {
            transport: Transport::Http {
                client,
                base_url: base_url.into(),
            },
        })
    }

    pub fn from_fixture(search_json: &str, nominations_json: &str) -> Self {
        Self {
            transport: Transport::Fixture {
                search_json: search_json.to_string(),
                nominations_json: nominations_json.to_string(),
            },
        }
    }

    async fn search_payload(&self, title: &str) -> Result<String> {
        match &self.transport {
            Transport::Http { client, base_url } => {
                let resp = client
                    .get(format!("{base_url}/films"))
                    .query(&[("q", title)])
                    .send()
                    .await
                    .context("awards search request")?
                    .error_for_status()
                    .context("awards search status")?;
                resp.text().await.context("awards search body")
            }
            Transport::Fixture { search_json, .. } => Ok(search_json.clone()),
        }
    }

    async fn nominations_payload(&self, path: &str) -> Result<String> {
        match &self.transport {
            Transport::Http { client, base_url } => {
                let resp = client
                    .get(format!("{base_url}{path}"))
                    .send()
                    .await
                    .context("awards nominations request")?
                    .error_for_status()
                    .context("awards nominations status")?;
                resp.text().await.context("awards nominations body")
            }
            Transport::Fixture {
                nominations_json, ..
            } => Ok(nominations_json.clone()),
        }
    }
}

fn row_to_entry(row: NominationRow) -> AwardEntry {
    let outcome = row.outcome.trim();
    let is_win = outcome.to_lowercase().starts_with("winner");
    let statement = RE_OUTCOME_PREFIX.replace(outcome, "").trim().to_string();
    let statement = if statement.is_empty() {
        None
    } else {
        Some(statement)
    };
    AwardEntry::from_raw(&row.category, statement.as_deref(), is_win)
}

#[async_trait]
impl AwardSource for AwardsDbProvider {
    async fn search_films(&self, title: &str) -> Result<Vec<RawSearchHit>> {
        let payload = self.search_payload(title).await?;

        let t0 = std::time::Instant::now();
        let env: SearchEnvelope =
            serde_json::from_str(&payload).context("parsing awards film search")?;
        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("lookup_candidates_total").increment(env.films.len() as u64);

        Ok(env
            .films
            .into_iter()
            .map(|row| RawSearchHit {
                title: row.title,
                url: row.url,
                year_hint: row.year.filter(|y| !y.is_empty()),
            })
            .collect())
    }

    async fn nominations(&self, candidate: &TitleCandidate) -> Result<Vec<AwardEntry>> {
        let payload = self.nominations_payload(&candidate.url).await?;
        let env: NominationsEnvelope =
            serde_json::from_str(&payload).context("parsing awards nominations")?;
        Ok(env.nominations.into_iter().map(row_to_entry).collect())
    }

    fn name(&self) -> &'static str {
        "awards-db"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"{
        "films": [
            {"title": "The Godfather Part II", "url": "/film/godfather-part-ii", "year": "1974"}
        ]
    }"#;

    const NOMINATIONS: &str = r#"{
        "nominations": [
            {"category": "BEST PICTURE", "outcome": "Winner: Francis Ford Coppola, Producer"},
            {"category": "ACTOR IN A SUPPORTING ROLE", "outcome": "Winner: Robert De Niro"},
            {"category": "ACTOR", "outcome": "Nominee: Al Pacino"},
            {"category": "JUVENILE AWARD", "outcome": "Nominee:"}
        ]
    }"#;

    fn candidate() -> TitleCandidate {
        TitleCandidate {
            title: "The Godfather Part II".into(),
            url: "/film/godfather-part-ii".into(),
            similarity: 1.0,
            year_hint: Some("1974".into()),
        }
    }

    #[tokio::test]
    async fn parses_film_rows() {
        let p = AwardsDbProvider::from_fixture(SEARCH, NOMINATIONS);
        let films = p.search_films("The Godfather Part II").await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].year_hint.as_deref(), Some("1974"));
    }

    #[tokio::test]
    async fn outcome_prefix_drives_win_flag_and_statement() {
        let p = AwardsDbProvider::from_fixture(SEARCH, NOMINATIONS);
        let noms = p.nominations(&candidate()).await.unwrap();
        assert_eq!(noms.len(), 4);

        assert!(noms[0].is_win);
        assert_eq!(noms[0].normalized_category, "Best Picture");
        assert_eq!(
            noms[0].full_category,
            "BEST PICTURE - Francis Ford Coppola, Producer"
        );

        assert!(!noms[2].is_win);
        assert_eq!(noms[2].normalized_category, "Best Actor");

        // bare outcome text: no statement appended
        assert_eq!(noms[3].full_category, "JUVENILE AWARD");
        assert_eq!(noms[3].normalized_category, "JUVENILE AWARD");
    }
}
