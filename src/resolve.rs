// src/resolve.rs
//! Candidate resolution: pick the best match for a target title among one
//! source's raw search results.

use tracing::debug;

use crate::record::{RawSearchHit, TitleCandidate};
use crate::similarity::similarity;

/// Tie-break bonus when a candidate's release-year hint appears verbatim in
/// the target string ("Dune 2021" vs the two Dunes).
const YEAR_HINT_BONUS: f64 = 0.1;

/// Select the single best match, or `None` for an empty list.
///
/// Callers must treat `None` as "source has no data", not as an error.
/// Selection is stable: ties keep the first-seen candidate, a deliberate
/// simplicity trade-off.
pub fn resolve_best(target: &str, candidates: &[RawSearchHit]) -> Option<TitleCandidate> {
    let mut best: Option<TitleCandidate> = None;
    let mut best_score = f64::NEG_INFINITY;

    for hit in candidates {
        let sim = similarity(target, &hit.title);
        let bonus = match hit.year_hint.as_deref() {
            Some(y) if !y.is_empty() && target.contains(y) => YEAR_HINT_BONUS,
            _ => 0.0,
        };
        let score = sim + bonus;
        debug!(target: "resolve", candidate = %hit.title, sim, score, "evaluated");
        if score > best_score {
            best_score = score;
            best = Some(TitleCandidate {
                title: hit.title.clone(),
                url: hit.url.clone(),
                similarity: sim,
                year_hint: hit.year_hint.clone(),
            });
        }
    }

    best
}

/// Like [`resolve_best`] but rejects winners whose raw similarity falls
/// below `min_similarity`. The awards pipeline uses this: acting on an
/// unrelated film's awards is worse than reporting none.
pub fn resolve_best_with_floor(
    target: &str,
    candidates: &[RawSearchHit],
    min_similarity: f64,
) -> Option<TitleCandidate> {
    resolve_best(target, candidates).filter(|c| c.similarity >= min_similarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str) -> RawSearchHit {
        RawSearchHit {
            title: title.to_string(),
            url: url.to_string(),
            year_hint: None,
        }
    }

    fn hit_year(title: &str, url: &str, year: &str) -> RawSearchHit {
        RawSearchHit {
            year_hint: Some(year.to_string()),
            ..hit(title, url)
        }
    }

    #[test]
    fn empty_list_is_no_match() {
        assert_eq!(resolve_best("Inception", &[]), None);
    }

    #[test]
    fn picks_highest_similarity() {
        let hits = vec![
            hit("Inception: The Cobol Job", "/short"),
            hit("Inception", "/main"),
        ];
        let best = resolve_best("Inception", &hits).unwrap();
        assert_eq!(best.url, "/main");
        assert_eq!(best.similarity, 1.0);
    }

    #[test]
    fn ties_keep_first_seen() {
        let hits = vec![hit("Heat", "/first"), hit("Heat", "/second")];
        let best = resolve_best("Heat", &hits).unwrap();
        assert_eq!(best.url, "/first");
    }

    #[test]
    fn year_hint_in_target_breaks_ties() {
        let hits = vec![
            hit_year("Dune", "/1984", "1984"),
            hit_year("Dune", "/2021", "2021"),
        ];
        let best = resolve_best("Dune 2021", &hits).unwrap();
        assert_eq!(best.url, "/2021");
    }

    #[test]
    fn similarity_field_excludes_the_bonus() {
        let hits = vec![hit_year("Dune", "/2021", "2021")];
        let best = resolve_best("Dune 2021", &hits).unwrap();
        assert!(best.similarity <= 1.0);
    }

    #[test]
    fn floor_rejects_weak_winners() {
        let hits = vec![hit("Something Else Entirely", "/x")];
        assert!(resolve_best_with_floor("Parasite", &hits, 0.5).is_none());
        let hits = vec![hit("Parasite", "/ok")];
        assert!(resolve_best_with_floor("Parasite", &hits, 0.5).is_some());
    }
}
