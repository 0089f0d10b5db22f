/// Quickstart - from a stats document to logo, headshot and video links
///
/// Runs offline on inline data; swap `normalize_document` for
/// `normalize(url, ...)` to hit the live endpoints.
use ballpark::frame::analysis::{left_join, rename, value_counts, COUNT_COLUMN};
use ballpark::links::{content_url, film_room_search_url, player_headshot_url, team_logo_url, ContentKind};
use ballpark::{EndpointNormalizer, FetchConfig, FlattenConfig, Table};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== Ballpark Quick Start ===\n");

    // Step 1: A teams document, shaped like the stats API response
    let teams_doc = json!({
        "copyright": "Copyright 2025",
        "teams": [
            {"id": 119, "name": "Los Angeles Dodgers", "league": {"id": 104, "name": "National League"}},
            {"id": 147, "name": "New York Yankees", "league": {"id": 103, "name": "American League"}}
        ]
    });

    // Step 2: Unwrap the `teams` field and flatten nested objects with `_`
    let normalizer = EndpointNormalizer::http(FetchConfig::default(), FlattenConfig::underscore())?;
    let teams = normalizer.normalize_document("inline:teams", teams_doc, Some("teams"))?;
    println!("Teams table columns: {:?}\n", teams.columns());

    // Step 3: One logo per team row
    for id in teams.column("id").into_iter().flatten().filter_map(|v| v.as_u64()) {
        println!("  logo {:>3}: {}", id, team_logo_url(id));
    }

    // Step 4: Count fan favorites and attach team names
    let fans = Table::from_records(serde_json::from_value(json!([
        {"user_id": 1, "favorite_team_id": 119},
        {"user_id": 2, "favorite_team_id": 147},
        {"user_id": 3, "favorite_team_id": 119}
    ]))?);
    let counts = value_counts(&fans.to_dataframe()?, &["favorite_team_id"])?;
    let counts = rename(&counts, COUNT_COLUMN, "num_favorites")?;
    let favorites = left_join(&counts, &teams.to_dataframe()?, "favorite_team_id", "id")?;
    let favorites = Table::from_dataframe(&favorites)?;

    println!("\nMost favorited teams:");
    for row in favorites.rows() {
        println!("  {} ({} fans)", row["name"], row["num_favorites"]);
    }

    // Step 5: Player headshot, a home run's Film Room search, and a news page
    let people_doc = json!({"people": [{"id": 660271, "fullName": "Shohei Ohtani"}]});
    let people = normalizer.normalize_document("inline:people", people_doc, Some("people"))?;
    if let Some(id) = people.get(0, "id").and_then(|v| v.as_u64()) {
        println!("\nHeadshot: {}", player_headshot_url(id));
    }
    println!(
        "Film Room: {}",
        film_room_search_url("560a2f9b-9589-4e4b-95f5-2ef796334a94")?
    );
    println!(
        "Article:   {}",
        content_url(ContentKind::Article, "every-2024-mlb-trade-deadline-deal")?
    );

    println!("\n✓ Done!");
    Ok(())
}
