use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    create_users_table(pool).await?;
    create_games_table(pool).await?;
    create_game_ownership_table(pool).await?;
    create_weekly_availability_table(pool).await?;
    create_game_exclusions_table(pool).await?;
    create_game_nights_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            discord_id TEXT UNIQUE NOT NULL,
            username TEXT NOT NULL,
            steam_id TEXT,
            is_active BOOLEAN DEFAULT TRUE,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_games_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            igdb_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            steam_appid TEXT,
            tags TEXT,
            min_players INTEGER,
            max_players INTEGER,
            last_played DATETIME,
            cover_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_game_ownership_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_ownership (
            user_id INTEGER NOT NULL,
            game_id INTEGER NOT NULL,
            source TEXT NOT NULL,
            liked BOOLEAN DEFAULT FALSE,
            disliked BOOLEAN DEFAULT FALSE,
            is_installed BOOLEAN DEFAULT FALSE,
            PRIMARY KEY (user_id, game_id, source),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (game_id) REFERENCES games (igdb_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_weekly_availability_table(pool: &SqlitePool) -> Result<()> {
    // available_days holds comma-joined weekday numbers, 0=Monday .. 6=Sunday
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weekly_availability (
            user_id INTEGER PRIMARY KEY,
            available_days TEXT,
            FOREIGN KEY (user_id) REFERENCES users (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_game_exclusions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_exclusions (
            user_id INTEGER NOT NULL,
            game_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, game_id),
            FOREIGN KEY (user_id) REFERENCES users (id),
            FOREIGN KEY (game_id) REFERENCES games (igdb_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_game_nights_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_nights (
            id INTEGER PRIMARY KEY,
            organizer_id INTEGER NOT NULL,
            scheduled_time DATETIME NOT NULL,
            channel_id TEXT NOT NULL,
            selected_game_id INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (organizer_id) REFERENCES users (id),
            FOREIGN KEY (selected_game_id) REFERENCES games (igdb_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
