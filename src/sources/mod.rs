// src/sources/mod.rs
pub mod providers;
pub mod types;

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::record::{AwardEntry, MovieRecord, SourceDetail};
use crate::taxonomy::normalize_genre;

/// One-time metrics registration (so series show up on the exporter the
/// service layer wires in).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("lookup_records_total", "Movie records built.");
        describe_counter!(
            "lookup_partial_total",
            "Records built with at least one source degraded."
        );
        describe_counter!(
            "lookup_source_errors_total",
            "Source failures after retry exhaustion."
        );
        describe_counter!("lookup_no_match_total", "Searches with no usable candidate.");
        describe_counter!(
            "lookup_candidates_total",
            "Raw search candidates returned by providers."
        );
        describe_histogram!("source_parse_ms", "Provider payload parse time in milliseconds.");
    });
}

/// Deduplicated, order-preserving union of normalized genre lists across
/// sources — the record-level `genres` invariant.
pub fn merge_genres<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for list in lists {
        for raw in list {
            for g in normalize_genre(raw) {
                if !out.contains(&g) {
                    out.push(g);
                }
            }
        }
    }
    out
}

/// Assemble the reconciled record from whatever each source produced.
pub fn merge_record(
    primary: Option<SourceDetail>,
    secondary: Option<SourceDetail>,
    awards: Vec<AwardEntry>,
) -> MovieRecord {
    let empty: &[String] = &[];
    let genres = merge_genres([
        primary.as_ref().map(|d| d.genres.as_slice()).unwrap_or(empty),
        secondary
            .as_ref()
            .map(|d| d.genres.as_slice())
            .unwrap_or(empty),
    ]);
    MovieRecord {
        primary,
        secondary,
        awards,
        genres,
    }
}
