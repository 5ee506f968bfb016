// src/score/mod.rs
// Section score engines: genre and award contributions, each bounded by the
// scale/weight its caller hands in. The blending of sections lives in
// `crate::engine`.

pub mod award;
pub mod genre;

pub use award::award_score;
pub use genre::genre_score;
