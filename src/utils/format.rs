use crate::database::models::Game;
use poise::serenity_prelude as serenity;

pub fn format_suggestion_list(games: &[Game]) -> String {
    if games.is_empty() {
        return "No games to suggest. Try adding games or loosening the filters.".to_string();
    }

    let mut list = String::new();
    for (rank, game) in games.iter().enumerate() {
        let mut details = vec![game.player_range_label()];
        if let Some(tags) = game.tags.as_deref() {
            if !tags.is_empty() {
                details.push(tags.to_string());
            }
        }
        list.push_str(&format!(
            "**{}. {}**\n   {}\n",
            rank + 1,
            game.title,
            details.join(" · ")
        ));
    }
    list
}

// Embed utility functions
pub fn create_success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x00ff00) // Green
        .timestamp(chrono::Utc::now())
}

pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0xff0000) // Red
        .timestamp(chrono::Utc::now())
}

pub fn create_info_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x3498db) // Blue
        .timestamp(chrono::Utc::now())
}

pub fn create_suggestion_embed(games: &[Game], group_size: Option<i64>) -> serenity::CreateEmbed {
    let footer = match group_size {
        Some(size) => format!("Ranked for a group of {}", size),
        None => "Ranked without a group size".to_string(),
    };

    serenity::CreateEmbed::new()
        .title("🎮 Tonight's suggestions")
        .description(format_suggestion_list(games))
        .color(0x9b59b6) // Purple
        .footer(serenity::CreateEmbedFooter::new(footer))
        .timestamp(chrono::Utc::now())
}
