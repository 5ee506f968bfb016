// src/sources/providers/omdb.rs
//! Primary ratings source: the OMDb JSON API (search + title detail).
//!
//! Fixture-backed construction exists for tests and the demo binary; the
//! HTTP path goes through `reqwest` with a per-request timeout. Retries are
//! the caller's job — the lookup layer wraps every call in the retry engine.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::record::{RawSearchHit, SourceDetail, TitleCandidate};
use crate::sources::types::MovieSource;

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Search", default)]
    search: Vec<SearchRow>,
    #[serde(rename = "Response")]
    response: String,
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Released", default)]
    released: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(rename = "Response")]
    response: String,
}

enum Transport {
    Http {
        client: reqwest::Client,
        base_url: String,
        api_key: String,
    },
    Fixture {
        search_json: String,
        detail_json: String,
    },
}

pub struct OmdbProvider {
    transport: Transport,
}

impl OmdbProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building omdb http client")?;
        Ok(Self {
            transport: Transport::Http {
                client,
                base_url: base_url.into(),
                api_key: api_key.into(),
            },
        })
    }

    /// Canned payloads for tests/demo.
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
            Transport::Http {
                client,
                base_url,
                api_key,
            } => {
                let resp = client
                    .get(format!("{base_url}/"))
                    .query(&[("apikey", api_key.as_str()), ("s", title), ("type", "movie")])
                    .send()
                    .await
                    .context("omdb search request")?
                    .error_for_status()
                    .context("omdb search status")?;
                resp.text().await.context("omdb search body")
            }
            Transport::Fixture { search_json, .. } => Ok(search_json.clone()),
        }
    }

    async fn detail_payload(&self, title: &str) -> Result<String> {
        match &self.transport {
            Transport::Http {
                client,
                base_url,
                api_key,
            } => {
                let resp = client
                    .get(format!("{base_url}/"))
                    .query(&[("apikey", api_key.as_str()), ("t", title)])
                    .send()
                    .await
                    .context("omdb detail request")?
                    .error_for_status()
                    .context("omdb detail status")?;
                resp.text().await.context("omdb detail body")
            }
            Transport::Fixture { detail_json, .. } => Ok(detail_json.clone()),
        }
    }
}

// OMDb writes "N/A" instead of omitting fields.
fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty() && s != "N/A")
}

fn imdb_url(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("https://www.imdb.com/title/{id}/"),
        _ => String::new(),
    }
}

#[async_trait]
impl MovieSource for OmdbProvider {
    async fn search(&self, title: &str) -> Result<Vec<RawSearchHit>> {
        let payload = self.search_payload(title).await?;

        let t0 = std::time::Instant::now();
        let env: SearchEnvelope =
            serde_json::from_str(&payload).context("parsing omdb search response")?;
        histogram!("source_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        // "Movie not found" is a no-match condition, not an error.
        if !env.response.eq_ignore_ascii_case("true") {
            return Ok(Vec::new());
        }

        counter!("lookup_candidates_total").increment(env.search.len() as u64);
        Ok(env
            .search
            .into_iter()
            .map(|row| RawSearchHit {
                url: imdb_url(row.imdb_id.as_deref()),
                title: row.title,
                year_hint: present(row.year),
            })
            .collect())
    }

    async fn detail(&self, candidate: &TitleCandidate) -> Result<SourceDetail> {
        let payload = self.detail_payload(&candidate.title).await?;
        let env: DetailEnvelope =
            serde_json::from_str(&payload).context("parsing omdb detail response")?;

        if !env.response.eq_ignore_ascii_case("true") {
            bail!("omdb detail not found for `{}`", candidate.title);
        }

        let rating = present(env.imdb_rating).and_then(|r| r.parse::<f64>().ok());
        let genres = present(env.genre)
            .map(|g| g.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();
        let url = if candidate.url.is_empty() {
            imdb_url(env.imdb_id.as_deref())
        } else {
            candidate.url.clone()
        };

        Ok(SourceDetail {
            title: env.title.unwrap_or_else(|| candidate.title.clone()),
            rating,
            image: present(env.poster),
            genres,
            release_date: present(env.released),
            url,
            ..Default::default()
        })
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
