use crate::database::models::{
    Game, GameExclusion, GameNight, GameOwnership, GameSource, OwnershipSummary, User,
    WeeklyAvailability,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::BTreeSet;

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

// User queries
pub async fn create_or_get_user(
    pool: &SqlitePool,
    discord_id: &str,
    username: &str,
) -> Result<User> {
    // Try to get existing user first
    if let Ok(user) = get_user_by_discord_id(pool, discord_id).await {
        return Ok(user);
    }

    // Create new user if not exists
    let user_id = sqlx::query("INSERT INTO users (discord_id, username) VALUES (?, ?)")
        .bind(discord_id)
        .bind(username)
        .execute(pool)
        .await?
        .last_insert_rowid();

    get_user_by_id(pool, user_id).await
}

pub async fn get_user_by_discord_id(pool: &SqlitePool, discord_id: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, discord_id, username, steam_id, is_active, created_at
         FROM users WHERE discord_id = ?",
    )
    .bind(discord_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, discord_id, username, steam_id, is_active, created_at
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_active_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, discord_id, username, steam_id, is_active, created_at
         FROM users WHERE is_active = TRUE ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

// Game queries
pub async fn upsert_game(
    pool: &SqlitePool,
    igdb_id: i64,
    title: &str,
    tags: Option<&str>,
    min_players: Option<i64>,
    max_players: Option<i64>,
) -> Result<Game> {
    sqlx::query(
        "INSERT INTO games (igdb_id, title, tags, min_players, max_players)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(igdb_id) DO UPDATE SET
             title = excluded.title,
             tags = excluded.tags,
             min_players = excluded.min_players,
             max_players = excluded.max_players",
    )
    .bind(igdb_id)
    .bind(title)
    .bind(tags)
    .bind(min_players)
    .bind(max_players)
    .execute(pool)
    .await?;

    get_game_by_id(pool, igdb_id).await
}

pub async fn get_game_by_id(pool: &SqlitePool, igdb_id: i64) -> Result<Game> {
    let game = sqlx::query_as::<_, Game>(
        "SELECT igdb_id, title, steam_appid, tags, min_players, max_players, last_played, cover_url
         FROM games WHERE igdb_id = ?",
    )
    .bind(igdb_id)
    .fetch_one(pool)
    .await?;

    Ok(game)
}

pub async fn get_game_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Game>> {
    let game = sqlx::query_as::<_, Game>(
        "SELECT igdb_id, title, steam_appid, tags, min_players, max_players, last_played, cover_url
         FROM games WHERE title = ? COLLATE NOCASE",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    Ok(game)
}

pub async fn mark_game_played(
    pool: &SqlitePool,
    igdb_id: i64,
    played_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE games SET last_played = ? WHERE igdb_id = ?")
        .bind(played_at)
        .bind(igdb_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Games owned by every listed user (set intersection, not union).
/// Ordered by igdb_id so ranking ties stay deterministic.
pub async fn get_common_games(pool: &SqlitePool, user_ids: &[i64]) -> Result<Vec<Game>> {
    let unique_ids: BTreeSet<i64> = user_ids.iter().copied().collect();
    if unique_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT g.igdb_id, g.title, g.steam_appid, g.tags, g.min_players, g.max_players,
                g.last_played, g.cover_url
         FROM games g
         JOIN game_ownership o ON o.game_id = g.igdb_id
         WHERE o.user_id IN ({})
         GROUP BY g.igdb_id
         HAVING COUNT(DISTINCT o.user_id) = ?
         ORDER BY g.igdb_id ASC",
        placeholders(unique_ids.len())
    );

    let mut query = sqlx::query_as::<_, Game>(&sql);
    for user_id in &unique_ids {
        query = query.bind(*user_id);
    }
    let games = query.bind(unique_ids.len() as i64).fetch_all(pool).await?;

    Ok(games)
}

// Ownership queries
pub async fn add_ownership(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
    source: GameSource,
) -> Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO game_ownership (user_id, game_id, source) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(game_id)
    .bind(source.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn remove_ownership(pool: &SqlitePool, user_id: i64, game_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM game_ownership WHERE user_id = ? AND game_id = ?")
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_ownership(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
) -> Result<Option<GameOwnership>> {
    let ownership = sqlx::query_as::<_, GameOwnership>(
        "SELECT user_id, game_id, source, liked, disliked, is_installed
         FROM game_ownership WHERE user_id = ? AND game_id = ? LIMIT 1",
    )
    .bind(user_id)
    .bind(game_id)
    .fetch_optional(pool)
    .await?;

    Ok(ownership)
}

pub async fn set_liked_status(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
    liked: bool,
) -> Result<()> {
    // Liking clears a standing dislike; unliking leaves it alone
    sqlx::query(
        "UPDATE game_ownership
         SET liked = ?, disliked = CASE WHEN ? THEN FALSE ELSE disliked END
         WHERE user_id = ? AND game_id = ?",
    )
    .bind(liked)
    .bind(liked)
    .bind(user_id)
    .bind(game_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_disliked_status(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
    disliked: bool,
) -> Result<()> {
    sqlx::query(
        "UPDATE game_ownership
         SET disliked = ?, liked = CASE WHEN ? THEN FALSE ELSE liked END
         WHERE user_id = ? AND game_id = ?",
    )
    .bind(disliked)
    .bind(disliked)
    .bind(user_id)
    .bind(game_id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn set_installed_status(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
    is_installed: bool,
) -> Result<()> {
    sqlx::query("UPDATE game_ownership SET is_installed = ? WHERE user_id = ? AND game_id = ?")
        .bind(is_installed)
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Ownership flags for one game across the listed users, one row per user.
/// A user owning the game from several sources collapses to the OR of the flags.
pub async fn get_group_preferences(
    pool: &SqlitePool,
    game_id: i64,
    user_ids: &[i64],
) -> Result<Vec<OwnershipSummary>> {
    let unique_ids: BTreeSet<i64> = user_ids.iter().copied().collect();
    if unique_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT user_id, MAX(liked) AS liked, MAX(disliked) AS disliked,
                MAX(is_installed) AS is_installed
         FROM game_ownership
         WHERE game_id = ? AND user_id IN ({})
         GROUP BY user_id
         ORDER BY user_id ASC",
        placeholders(unique_ids.len())
    );

    let mut query = sqlx::query_as::<_, OwnershipSummary>(&sql).bind(game_id);
    for user_id in &unique_ids {
        query = query.bind(*user_id);
    }
    let summaries = query.fetch_all(pool).await?;

    Ok(summaries)
}

// Weekly availability queries
pub async fn get_weekly_availability(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Option<WeeklyAvailability>> {
    let availability = sqlx::query_as::<_, WeeklyAvailability>(
        "SELECT user_id, available_days FROM weekly_availability WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(availability)
}

pub async fn set_weekly_availability(
    pool: &SqlitePool,
    user_id: i64,
    available_days: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO weekly_availability (user_id, available_days) VALUES (?, ?)
         ON CONFLICT(user_id) DO UPDATE SET available_days = excluded.available_days",
    )
    .bind(user_id)
    .bind(available_days)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn clear_weekly_availability(pool: &SqlitePool, user_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM weekly_availability WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

// Exclusion queries
pub async fn add_exclusion(pool: &SqlitePool, user_id: i64, game_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO game_exclusions (user_id, game_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn remove_exclusion(pool: &SqlitePool, user_id: i64, game_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM game_exclusions WHERE user_id = ? AND game_id = ?")
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_exclusions(pool: &SqlitePool, user_ids: &[i64]) -> Result<Vec<GameExclusion>> {
    let unique_ids: BTreeSet<i64> = user_ids.iter().copied().collect();
    if unique_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sql = format!(
        "SELECT user_id, game_id FROM game_exclusions WHERE user_id IN ({})",
        placeholders(unique_ids.len())
    );

    let mut query = sqlx::query_as::<_, GameExclusion>(&sql);
    for user_id in &unique_ids {
        query = query.bind(*user_id);
    }
    let exclusions = query.fetch_all(pool).await?;

    Ok(exclusions)
}

// Game night queries
pub async fn create_game_night(
    pool: &SqlitePool,
    organizer_id: i64,
    scheduled_time: DateTime<Utc>,
    channel_id: &str,
) -> Result<GameNight> {
    let game_night_id = sqlx::query(
        "INSERT INTO game_nights (organizer_id, scheduled_time, channel_id) VALUES (?, ?, ?)",
    )
    .bind(organizer_id)
    .bind(scheduled_time)
    .bind(channel_id)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_game_night_by_id(pool, game_night_id).await
}

pub async fn get_game_night_by_id(pool: &SqlitePool, game_night_id: i64) -> Result<GameNight> {
    let game_night = sqlx::query_as::<_, GameNight>(
        "SELECT id, organizer_id, scheduled_time, channel_id, selected_game_id, created_at
         FROM game_nights WHERE id = ?",
    )
    .bind(game_night_id)
    .fetch_one(pool)
    .await?;

    Ok(game_night)
}

pub async fn get_latest_game_night(pool: &SqlitePool) -> Result<Option<GameNight>> {
    let game_night = sqlx::query_as::<_, GameNight>(
        "SELECT id, organizer_id, scheduled_time, channel_id, selected_game_id, created_at
         FROM game_nights ORDER BY scheduled_time DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(game_night)
}

pub async fn set_selected_game(
    pool: &SqlitePool,
    game_night_id: i64,
    game_id: i64,
) -> Result<()> {
    sqlx::query("UPDATE game_nights SET selected_game_id = ? WHERE id = ?")
        .bind(game_id)
        .bind(game_night_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Game ids selected for sessions scheduled after `since`, one entry per session.
pub async fn get_recent_picks(pool: &SqlitePool, since: DateTime<Utc>) -> Result<Vec<i64>> {
    let picks = sqlx::query_scalar::<_, i64>(
        "SELECT selected_game_id FROM game_nights
         WHERE selected_game_id IS NOT NULL AND scheduled_time > ?",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use chrono::Duration;

    async fn seed_user(pool: &SqlitePool, discord_id: &str) -> User {
        create_or_get_user(pool, discord_id, discord_id).await.unwrap()
    }

    async fn seed_game(pool: &SqlitePool, igdb_id: i64, title: &str) -> Game {
        upsert_game(pool, igdb_id, title, None, None, None).await.unwrap()
    }

    #[tokio::test]
    async fn common_games_is_an_intersection() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        let x = seed_game(&pool, 1, "Game X").await;
        let y = seed_game(&pool, 2, "Game Y").await;
        let z = seed_game(&pool, 3, "Game Z").await;

        add_ownership(&pool, a.id, x.igdb_id, GameSource::Steam).await.unwrap();
        add_ownership(&pool, a.id, y.igdb_id, GameSource::Steam).await.unwrap();
        add_ownership(&pool, b.id, y.igdb_id, GameSource::Manual).await.unwrap();
        add_ownership(&pool, b.id, z.igdb_id, GameSource::Manual).await.unwrap();

        let common = get_common_games(&pool, &[a.id, b.id]).await.unwrap();
        let titles: Vec<&str> = common.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Game Y"]);
    }

    #[tokio::test]
    async fn common_games_counts_multi_source_owners_once() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let b = seed_user(&pool, "b").await;
        let x = seed_game(&pool, 1, "Game X").await;

        // User a owns from two sources; still only one distinct owner
        add_ownership(&pool, a.id, x.igdb_id, GameSource::Steam).await.unwrap();
        add_ownership(&pool, a.id, x.igdb_id, GameSource::GamePass).await.unwrap();

        let common = get_common_games(&pool, &[a.id, b.id]).await.unwrap();
        assert!(common.is_empty());
    }

    #[tokio::test]
    async fn group_preferences_collapse_sources_per_user() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let game = seed_game(&pool, 1, "Game X").await;

        add_ownership(&pool, a.id, game.igdb_id, GameSource::Steam).await.unwrap();
        add_ownership(&pool, a.id, game.igdb_id, GameSource::GamePass).await.unwrap();
        set_liked_status(&pool, a.id, game.igdb_id, true).await.unwrap();

        let prefs = get_group_preferences(&pool, game.igdb_id, &[a.id]).await.unwrap();
        assert_eq!(prefs.len(), 1);
        assert!(prefs[0].liked);
        assert!(!prefs[0].disliked);
    }

    #[tokio::test]
    async fn liking_clears_a_standing_dislike() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let game = seed_game(&pool, 1, "Game X").await;
        add_ownership(&pool, a.id, game.igdb_id, GameSource::Manual).await.unwrap();

        set_disliked_status(&pool, a.id, game.igdb_id, true).await.unwrap();
        set_liked_status(&pool, a.id, game.igdb_id, true).await.unwrap();

        let ownership = get_ownership(&pool, a.id, game.igdb_id).await.unwrap().unwrap();
        assert!(ownership.liked);
        assert!(!ownership.disliked);
    }

    #[tokio::test]
    async fn weekly_availability_upsert_round_trips() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;

        assert!(get_weekly_availability(&pool, a.id).await.unwrap().is_none());

        set_weekly_availability(&pool, a.id, Some("0,2,4")).await.unwrap();
        let row = get_weekly_availability(&pool, a.id).await.unwrap().unwrap();
        assert_eq!(row.available_days.as_deref(), Some("0,2,4"));

        set_weekly_availability(&pool, a.id, None).await.unwrap();
        let row = get_weekly_availability(&pool, a.id).await.unwrap().unwrap();
        assert!(row.available_days.is_none());
    }

    #[tokio::test]
    async fn recent_picks_respect_the_window() {
        let pool = test_pool().await;
        let a = seed_user(&pool, "a").await;
        let game = seed_game(&pool, 1, "Game X").await;
        let now = Utc::now();

        let recent = create_game_night(&pool, a.id, now - Duration::days(5), "c1").await.unwrap();
        let old = create_game_night(&pool, a.id, now - Duration::days(45), "c1").await.unwrap();
        set_selected_game(&pool, recent.id, game.igdb_id).await.unwrap();
        set_selected_game(&pool, old.id, game.igdb_id).await.unwrap();

        let picks = get_recent_picks(&pool, now - Duration::days(30)).await.unwrap();
        assert_eq!(picks, vec![game.igdb_id]);
    }
}
