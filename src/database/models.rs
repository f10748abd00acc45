use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub discord_id: String,
    pub username: String,
    pub steam_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Game {
    pub igdb_id: i64,
    pub title: String,
    pub steam_appid: Option<String>,
    pub tags: Option<String>,
    pub min_players: Option<i64>,
    pub max_players: Option<i64>,
    pub last_played: Option<DateTime<Utc>>,
    pub cover_url: Option<String>,
}

impl Game {
    /// Tags are stored comma-joined; missing tags read as the empty set.
    pub fn tag_set(&self) -> HashSet<String> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn player_range_label(&self) -> String {
        match (self.min_players, self.max_players) {
            (Some(min), Some(max)) => format!("{}-{} players", min, max),
            (Some(min), None) => format!("{}+ players", min),
            (None, Some(max)) => format!("up to {} players", max),
            (None, None) => "player count unknown".to_string(),
        }
    }
}

/// One ownership row per (user, game, source).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameOwnership {
    pub user_id: i64,
    pub game_id: i64,
    pub source: String,
    pub liked: bool,
    pub disliked: bool,
    pub is_installed: bool,
}

/// Per-user ownership flags for one game, collapsed across sources.
#[derive(Debug, Clone, FromRow)]
pub struct OwnershipSummary {
    pub user_id: i64,
    pub liked: bool,
    pub disliked: bool,
    pub is_installed: bool,
}

/// Recurring weekly availability. A missing row means "always available";
/// a row with no days means "never available".
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub user_id: i64,
    pub available_days: Option<String>,
}

impl WeeklyAvailability {
    /// Stored as comma-joined weekday numbers (0=Monday .. 6=Sunday).
    pub fn day_set(&self) -> HashSet<u32> {
        self.available_days
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|d| d.trim().parse::<u32>().ok())
            .filter(|d| *d <= 6)
            .collect()
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameExclusion {
    pub user_id: i64,
    pub game_id: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameNight {
    pub id: i64,
    pub organizer_id: i64,
    pub scheduled_time: DateTime<Utc>,
    pub channel_id: String,
    pub selected_game_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub enum GameSource {
    Steam,
    Xbox,
    GamePass,
    Manual,
}

impl GameSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameSource::Steam => "steam",
            GameSource::Xbox => "xbox",
            GameSource::GamePass => "game_pass",
            GameSource::Manual => "manual",
        }
    }
}
