// src/sources/providers/mod.rs
pub mod awards_db;
pub mod omdb;
pub mod scorecard;

pub use awards_db::AwardsDbProvider;
pub use omdb::OmdbProvider;
pub use scorecard::ScorecardProvider;
