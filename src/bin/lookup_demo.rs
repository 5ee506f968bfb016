//! Demo that runs the full lookup + decision pipeline against the bundled
//! fixture payloads and prints the decision as JSON.

use anyhow::Result;
use async_trait::async_trait;

use reelscore::config::CoreConfig;
use reelscore::lookup::MovieLookup;
use reelscore::prefs::{PreferenceStore, UserPreferences, PREF_CRITIC_SCORE};
use reelscore::sources::providers::{AwardsDbProvider, OmdbProvider, ScorecardProvider};

struct DemoStore;

#[async_trait]
impl PreferenceStore for DemoStore {
    async fn load(&self, _user_id: &str) -> Result<UserPreferences> {
        let mut prefs = UserPreferences::neutral();
        prefs.ratings.set(PREF_CRITIC_SCORE, 8.0);
        prefs.genres.set("Crime", 9.0);
        prefs.genres.set("Drama", 8.0);
        prefs.awards.set("Best Picture", 9.0);
        prefs.award_importance = Some(7.0);
        Ok(prefs)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = CoreConfig::load()?;

    let primary = OmdbProvider::from_fixture(
        include_str!("../../tests/fixtures/omdb_search.json"),
        include_str!("../../tests/fixtures/omdb_detail.json"),
    );
    let secondary = ScorecardProvider::from_fixture(
        include_str!("../../tests/fixtures/scorecard_search.json"),
        include_str!("../../tests/fixtures/scorecard_detail_modern.json"),
    );
    let awards = AwardsDbProvider::from_fixture(
        include_str!("../../tests/fixtures/awards_search.json"),
        include_str!("../../tests/fixtures/awards_nominations.json"),
    );

    let lookup = MovieLookup::new(
        Box::new(primary),
        Box::new(secondary),
        Box::new(awards),
        cfg,
    );

    let decision = lookup
        .decide(&DemoStore, "demo-user", "The Godfather Part II")
        .await?;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
