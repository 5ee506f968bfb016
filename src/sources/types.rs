// src/sources/types.rs
use anyhow::Result;

use crate::record::{AwardEntry, RawSearchHit, SourceDetail, TitleCandidate};

/// A rating-bearing external source: a search call producing raw hits, then
/// a detail fetch for the resolved candidate. The core never cares how the
/// adapter obtains either payload.
#[async_trait::async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, title: &str) -> Result<Vec<RawSearchHit>>;
    async fn detail(&self, candidate: &TitleCandidate) -> Result<SourceDetail>;
    fn name(&self) -> &'static str;
}

/// The awards database: film search plus the nomination/win rows of the
/// resolved film.
#[async_trait::async_trait]
pub trait AwardSource: Send + Sync {
    async fn search_films(&self, title: &str) -> Result<Vec<RawSearchHit>>;
    async fn nominations(&self, candidate: &TitleCandidate) -> Result<Vec<AwardEntry>>;
    fn name(&self) -> &'static str;
}
