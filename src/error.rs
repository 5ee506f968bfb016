// src/error.rs
//! The typed failure surface of the decision pipeline.
//!
//! Most failure modes never reach here: transient source errors are retried
//! and then degrade the record to partial data, and "no match" travels as
//! `None`/empty. The exception is the preference store — without it a
//! decision has no meaningful basis, so it aborts loudly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("preference store unavailable for user `{user}`: {source}")]
    PreferenceStore {
        user: String,
        #[source]
        source: anyhow::Error,
    },
}
