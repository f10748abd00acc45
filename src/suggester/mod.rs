pub mod availability;
pub mod scoring;

use crate::database::models::Game;
use crate::database::queries;
use chrono::{DateTime, Datelike, Duration, Utc};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use scoring::ScoreInputs;

/// Days a previously selected game keeps its anti-repetition penalty.
pub const REPETITION_WINDOW_DAYS: i64 = 30;

/// Ranks the games commonly owned by the given users, best candidate first.
///
/// The pool is first narrowed to users free on the weekday of `now`; common
/// ownership is computed over that narrowed set. Exclusions and per-user
/// preferences are taken from the full caller-supplied list, since a veto or
/// a dislike matters even for someone who happens to be busy today.
///
/// Empty results are ordinary outcomes, not errors, and any single lookup
/// that fails is degraded to "no record" so one flaky read cannot sink the
/// whole ranking. Callers typically keep only a small prefix of the result.
pub async fn suggest_games(
    pool: &SqlitePool,
    user_ids: &[i64],
    group_size: Option<i64>,
    preferred_tags: Option<&[String]>,
    now: DateTime<Utc>,
) -> Vec<Game> {
    let mut records: HashMap<i64, HashSet<u32>> = HashMap::new();
    for user_id in user_ids {
        match queries::get_weekly_availability(pool, *user_id).await {
            Ok(Some(row)) => {
                records.insert(*user_id, row.day_set());
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id, error = %e, "availability lookup failed, treating as no record");
            }
        }
    }

    let present = availability::filter_available(user_ids, &records, now.weekday());
    if present.is_empty() {
        info!(requested = user_ids.len(), "nobody is available today, no suggestions");
        return Vec::new();
    }

    let mut games = match queries::get_common_games(pool, &present).await {
        Ok(games) => games,
        Err(e) => {
            warn!(error = %e, "common ownership lookup failed");
            return Vec::new();
        }
    };
    if games.is_empty() {
        info!(present = present.len(), "no commonly owned games");
        return Vec::new();
    }

    // A veto from anyone in the original request removes the game outright
    let excluded: HashSet<i64> = match queries::get_exclusions(pool, user_ids).await {
        Ok(rows) => rows.into_iter().map(|row| row.game_id).collect(),
        Err(e) => {
            warn!(error = %e, "exclusion lookup failed, treating as none");
            HashSet::new()
        }
    };
    games.retain(|game| !excluded.contains(&game.igdb_id));

    let since = now - Duration::days(REPETITION_WINDOW_DAYS);
    let recent_picks = match queries::get_recent_picks(pool, since).await {
        Ok(picks) => picks,
        Err(e) => {
            warn!(error = %e, "recent pick lookup failed, treating as none");
            Vec::new()
        }
    };

    let preferred_tags = preferred_tags.unwrap_or(&[]);
    let mut scored: Vec<(Game, i64)> = Vec::with_capacity(games.len());
    for game in games {
        let preferences = match queries::get_group_preferences(pool, game.igdb_id, user_ids).await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(game_id = game.igdb_id, error = %e, "preference lookup failed, treating as none");
                Vec::new()
            }
        };

        let score = scoring::score_game(
            &game,
            &ScoreInputs {
                group_size,
                preferred_tags,
                now,
                preferences: &preferences,
                recent_picks: &recent_picks,
            },
        );
        scored.push((game, score));
    }

    // Stable sort: equal scores keep the intersection query's igdb_id order
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    info!(
        requested = user_ids.len(),
        present = present.len(),
        suggestions = scored.len(),
        top_score = scored.first().map(|(_, score)| *score),
        "ranked game suggestions"
    );

    scored.into_iter().map(|(game, _)| game).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{GameSource, User};
    use crate::database::test_pool;

    async fn seed_user(pool: &SqlitePool, discord_id: &str) -> User {
        queries::create_or_get_user(pool, discord_id, discord_id).await.unwrap()
    }

    async fn seed_owned_game(
        pool: &SqlitePool,
        igdb_id: i64,
        title: &str,
        owners: &[i64],
    ) -> Game {
        let game = queries::upsert_game(pool, igdb_id, title, None, None, None).await.unwrap();
        for owner in owners {
            queries::add_ownership(pool, *owner, igdb_id, GameSource::Steam).await.unwrap();
        }
        game
    }

    fn titles(games: &[Game]) -> Vec<&str> {
        games.iter().map(|g| g.title.as_str()).collect()
    }

    /// Weekday number (0=Monday .. 6=Sunday) of `now`.
    fn today(now: DateTime<Utc>) -> u32 {
        now.weekday().num_days_from_monday()
    }

    #[tokio::test]
    async fn empty_user_list_yields_no_suggestions() {
        let pool = test_pool().await;
        let suggested = suggest_games(&pool, &[], Some(4), None, Utc::now()).await;
        assert!(suggested.is_empty());
    }

    #[tokio::test]
    async fn all_users_busy_today_yields_no_suggestions() {
        let pool = test_pool().await;
        let now = Utc::now();
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        seed_owned_game(&pool, 1, "Game X", &[a.id, b.id]).await;

        // Everyone is only free on a day other than today
        let other_day = (today(now) + 1) % 7;
        let days = other_day.to_string();
        queries::set_weekly_availability(&pool, a.id, Some(&days)).await.unwrap();
        queries::set_weekly_availability(&pool, b.id, Some(&days)).await.unwrap();

        let suggested = suggest_games(&pool, &[a.id, b.id], Some(2), None, now).await;
        assert!(suggested.is_empty());
    }

    #[tokio::test]
    async fn only_commonly_owned_games_are_suggested() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        seed_owned_game(&pool, 1, "Game X", &[a.id]).await;
        seed_owned_game(&pool, 2, "Game Y", &[a.id, b.id]).await;
        seed_owned_game(&pool, 3, "Game Z", &[b.id]).await;

        let suggested = suggest_games(&pool, &[a.id, b.id], None, None, Utc::now()).await;
        assert_eq!(titles(&suggested), vec!["Game Y"]);
    }

    #[tokio::test]
    async fn exclusion_by_any_user_is_a_veto() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        let c = seed_user(&pool, "c").await;
        let users = [a.id, b.id, c.id];
        let game_a = seed_owned_game(&pool, 1, "Game A", &users).await;
        seed_owned_game(&pool, 2, "Game B", &users).await;

        // Make the vetoed game the obvious favourite on every other factor
        queries::set_liked_status(&pool, a.id, game_a.igdb_id, true).await.unwrap();
        queries::set_liked_status(&pool, b.id, game_a.igdb_id, true).await.unwrap();
        queries::add_exclusion(&pool, a.id, game_a.igdb_id).await.unwrap();

        let suggested = suggest_games(&pool, &users, None, None, Utc::now()).await;
        assert_eq!(titles(&suggested), vec!["Game B"]);
    }

    #[tokio::test]
    async fn busy_users_do_not_count_toward_common_ownership() {
        let pool = test_pool().await;
        let now = Utc::now();
        let u1 = seed_user(&pool, "u1").await;
        let u2 = seed_user(&pool, "u2").await;
        let u3 = seed_user(&pool, "u3").await;
        // Shared only between u1 and u2; u3 does not own it
        seed_owned_game(&pool, 1, "Game X", &[u1.id, u2.id]).await;
        // Shared by everyone who is actually free today
        seed_owned_game(&pool, 2, "Game Y", &[u2.id, u3.id]).await;

        // u1 is busy today, so the intersection runs over u2 and u3 alone
        let other_day = (today(now) + 1) % 7;
        queries::set_weekly_availability(&pool, u1.id, Some(&other_day.to_string()))
            .await
            .unwrap();

        let suggested = suggest_games(&pool, &[u1.id, u2.id, u3.id], None, None, now).await;
        assert_eq!(titles(&suggested), vec!["Game Y"]);
    }

    #[tokio::test]
    async fn busy_users_still_veto_and_still_weigh_in() {
        let pool = test_pool().await;
        let now = Utc::now();
        let u1 = seed_user(&pool, "u1").await;
        let u2 = seed_user(&pool, "u2").await;
        let game_x = seed_owned_game(&pool, 1, "Game X", &[u1.id, u2.id]).await;
        seed_owned_game(&pool, 2, "Game Y", &[u1.id, u2.id]).await;

        let other_day = (today(now) + 1) % 7;
        queries::set_weekly_availability(&pool, u1.id, Some(&other_day.to_string()))
            .await
            .unwrap();
        queries::add_exclusion(&pool, u1.id, game_x.igdb_id).await.unwrap();

        let suggested = suggest_games(&pool, &[u1.id, u2.id], None, None, now).await;
        assert_eq!(titles(&suggested), vec!["Game Y"]);
    }

    #[tokio::test]
    async fn liked_games_rank_above_identical_unliked_games() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        let users = [a.id, b.id];
        seed_owned_game(&pool, 1, "Plain", &users).await;
        let favourite = seed_owned_game(&pool, 2, "Favourite", &users).await;
        let hated = seed_owned_game(&pool, 3, "Hated", &users).await;

        queries::set_liked_status(&pool, a.id, favourite.igdb_id, true).await.unwrap();
        queries::set_disliked_status(&pool, a.id, hated.igdb_id, true).await.unwrap();

        let suggested = suggest_games(&pool, &users, None, None, Utc::now()).await;
        assert_eq!(titles(&suggested), vec!["Favourite", "Plain", "Hated"]);
    }

    #[tokio::test]
    async fn recently_picked_game_drops_in_the_ranking() {
        let pool = test_pool().await;
        let now = Utc::now();
        let a = seed_user(&pool, "a").await;
        let winner = seed_owned_game(&pool, 1, "Last Week's Winner", &[a.id]).await;
        seed_owned_game(&pool, 2, "Fresh Pick", &[a.id]).await;

        let night = queries::create_game_night(&pool, a.id, now - Duration::days(6), "c1")
            .await
            .unwrap();
        queries::set_selected_game(&pool, night.id, winner.igdb_id).await.unwrap();

        let suggested = suggest_games(&pool, &[a.id], None, None, now).await;
        assert_eq!(titles(&suggested), vec!["Fresh Pick", "Last Week's Winner"]);
    }

    #[tokio::test]
    async fn preferred_tags_pull_matching_games_up() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        queries::upsert_game(&pool, 1, "Shooter", Some("shooter"), None, None).await.unwrap();
        queries::upsert_game(&pool, 2, "Strategy Co-op", Some("strategy,coop"), None, None)
            .await
            .unwrap();
        queries::add_ownership(&pool, a.id, 1, GameSource::Steam).await.unwrap();
        queries::add_ownership(&pool, a.id, 2, GameSource::Steam).await.unwrap();

        let tags = vec!["strategy".to_string(), "coop".to_string()];
        let suggested = suggest_games(&pool, &[a.id], None, Some(&tags), Utc::now()).await;
        assert_eq!(titles(&suggested), vec!["Strategy Co-op", "Shooter"]);
    }

    #[tokio::test]
    async fn ties_keep_ascending_game_id_order() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        seed_owned_game(&pool, 9, "Later", &[a.id]).await;
        seed_owned_game(&pool, 4, "Earlier", &[a.id]).await;

        let suggested = suggest_games(&pool, &[a.id], None, None, Utc::now()).await;
        assert_eq!(titles(&suggested), vec!["Earlier", "Later"]);
    }
}
