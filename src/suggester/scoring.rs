use crate::database::models::{Game, OwnershipSummary};
use chrono::{DateTime, Utc};

// Group-size fit
pub const STRICT_SIZE_FIT: i64 = 10;
pub const LOOSE_SIZE_FIT: i64 = 5;
pub const PARTIAL_SIZE_FIT: i64 = 3;
pub const SIZE_FIT_SLACK: i64 = 2;

// Recency of play
pub const PLAYED_TODAY_PENALTY: i64 = -10;
pub const PLAYED_THIS_WEEK_PENALTY: i64 = -5;
pub const AGE_BONUS_CAP: i64 = 10;
pub const AGE_BONUS_PERIOD_DAYS: i64 = 30;

// Preferences
pub const TAG_MATCH_BONUS: i64 = 50;
pub const LIKED_BONUS: i64 = 20;
pub const DISLIKED_PENALTY: i64 = -20;
pub const INSTALLED_BONUS: i64 = 15;

// Anti-repetition
pub const RECENT_PICK_PENALTY: i64 = -50;

/// Everything the scoring of a single game depends on, gathered up front so
/// the computation itself stays pure and clock-free.
pub struct ScoreInputs<'a> {
    pub group_size: Option<i64>,
    pub preferred_tags: &'a [String],
    pub now: DateTime<Utc>,
    /// Ownership flags for this game, one entry per requesting user that owns it.
    pub preferences: &'a [OwnershipSummary],
    /// Game ids selected for sessions inside the anti-repetition window,
    /// one entry per session.
    pub recent_picks: &'a [i64],
}

/// Additive heuristic score; higher is a better candidate. Missing optional
/// data never fails, it just contributes nothing.
pub fn score_game(game: &Game, inputs: &ScoreInputs) -> i64 {
    let mut score = 0;

    if let Some(size) = inputs.group_size {
        score += match (game.min_players, game.max_players) {
            (Some(min), Some(max)) if min <= size && size <= max => STRICT_SIZE_FIT,
            (Some(min), Some(max))
                if min - SIZE_FIT_SLACK <= size && size <= max + SIZE_FIT_SLACK =>
            {
                LOOSE_SIZE_FIT
            }
            (Some(min), None) if size >= min => PARTIAL_SIZE_FIT,
            (None, Some(max)) if size <= max => PARTIAL_SIZE_FIT,
            _ => 0,
        };
    }

    if let Some(last_played) = game.last_played {
        let days_since = (inputs.now - last_played).num_days();
        if days_since < 1 {
            score += PLAYED_TODAY_PENALTY;
        } else if days_since < 7 {
            score += PLAYED_THIS_WEEK_PENALTY;
        }
        // The age bonus applies alongside the penalty bands, not instead of them
        score += (days_since / AGE_BONUS_PERIOD_DAYS).clamp(0, AGE_BONUS_CAP);
    }

    if !inputs.preferred_tags.is_empty() {
        let game_tags = game.tag_set();
        for tag in inputs.preferred_tags {
            if game_tags.contains(tag.as_str()) {
                score += TAG_MATCH_BONUS;
            }
        }
    }

    for preference in inputs.preferences {
        if preference.liked {
            score += LIKED_BONUS;
        } else if preference.disliked {
            score += DISLIKED_PENALTY;
        }
        if preference.is_installed {
            score += INSTALLED_BONUS;
        }
    }

    for pick in inputs.recent_picks {
        if *pick == game.igdb_id {
            score += RECENT_PICK_PENALTY;
        }
    }

    score
}
