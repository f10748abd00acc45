use crate::bot::{Context, Error};
use crate::database::models::{Game, GameSource, User};
use crate::database::queries;
use crate::suggester;
use crate::utils::format::{create_error_embed, create_info_embed, create_success_embed, create_suggestion_embed};
use chrono::Utc;

/// How many ranked games a suggestion reply shows.
const SUGGESTION_LIMIT: usize = 3;

/// Resolves the command author to a database user, replying with an error
/// embed (and returning None) when the lookup fails.
pub(super) async fn author_user(ctx: Context<'_>) -> Result<Option<User>, Error> {
    let discord_id = ctx.author().id.to_string();
    let username = ctx.author().name.clone();

    match queries::create_or_get_user(&ctx.data().pool, &discord_id, &username).await {
        Ok(user) => Ok(Some(user)),
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to look up your account: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            Ok(None)
        }
    }
}

/// Looks up a game by title, replying with an error embed when it is unknown.
pub(super) async fn find_game(ctx: Context<'_>, title: &str) -> Result<Option<Game>, Error> {
    match queries::get_game_by_title(&ctx.data().pool, title).await {
        Ok(Some(game)) => Ok(Some(game)),
        Ok(None) => {
            let embed = create_error_embed(
                "Unknown game",
                &format!("No game called **{}** in the library. Add it with `/add_game`.", title),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            Ok(None)
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Game lookup failed: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            Ok(None)
        }
    }
}

/// Suggests games for tonight based on shared libraries and preferences
#[poise::command(slash_command)]
pub async fn suggest(
    ctx: Context<'_>,
    #[description = "Number of players in the group"] group_size: Option<i64>,
    #[description = "Preferred tags, comma-separated (e.g. strategy,coop)"] tags: Option<String>,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;
    ctx.defer().await?;

    let users = match queries::get_active_users(pool).await {
        Ok(users) => users,
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to load players: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    if users.is_empty() {
        let embed = create_info_embed(
            "No players yet",
            "Nobody is registered. Run `/add_game` to register yourself and your games.",
        );
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let user_ids: Vec<i64> = users.iter().map(|user| user.id).collect();
    let preferred_tags: Option<Vec<String>> = tags.map(|t| {
        t.split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    });

    let ranked = suggester::suggest_games(
        pool,
        &user_ids,
        group_size,
        preferred_tags.as_deref(),
        Utc::now(),
    )
    .await;

    if ranked.is_empty() {
        let embed = create_info_embed(
            "No suggestions",
            "No commonly owned game fits tonight. Maybe not enough people are available today.",
        );
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let top: Vec<Game> = ranked.into_iter().take(SUGGESTION_LIMIT).collect();
    let embed = create_suggestion_embed(&top, group_size);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Manually adds a game you own to your library
#[poise::command(slash_command)]
pub async fn add_game(
    ctx: Context<'_>,
    #[description = "IGDB id of the game"] igdb_id: i64,
    #[description = "Title of the game"] title: String,
    #[description = "Tags, comma-separated"] tags: Option<String>,
    #[description = "Minimum player count"] min_players: Option<i64>,
    #[description = "Maximum player count"] max_players: Option<i64>,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    let game = match queries::upsert_game(pool, igdb_id, &title, tags.as_deref(), min_players, max_players).await {
        Ok(game) => game,
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to save the game: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    if let Err(e) = queries::add_ownership(pool, user.id, game.igdb_id, GameSource::Manual).await {
        let embed = create_error_embed("Error", &format!("Failed to record ownership: {}", e));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let embed = create_success_embed(
        "Game added",
        &format!("**{}** is now in your library ({}).", game.title, game.player_range_label()),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Marks a game in your library as liked
#[poise::command(slash_command)]
pub async fn like(
    ctx: Context<'_>,
    #[description = "Title of the game"] title: String,
) -> Result<(), Error> {
    set_preference(ctx, &title, Preference::Liked).await
}

/// Marks a game in your library as disliked
#[poise::command(slash_command)]
pub async fn dislike(
    ctx: Context<'_>,
    #[description = "Title of the game"] title: String,
) -> Result<(), Error> {
    set_preference(ctx, &title, Preference::Disliked).await
}

/// Marks a game in your library as installed (or not)
#[poise::command(slash_command)]
pub async fn installed(
    ctx: Context<'_>,
    #[description = "Title of the game"] title: String,
    #[description = "Whether the game is installed (default: yes)"] installed: Option<bool>,
) -> Result<(), Error> {
    set_preference(ctx, &title, Preference::Installed(installed.unwrap_or(true))).await
}

enum Preference {
    Liked,
    Disliked,
    Installed(bool),
}

async fn set_preference(ctx: Context<'_>, title: &str, preference: Preference) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };
    let game = match find_game(ctx, title).await? {
        Some(game) => game,
        None => return Ok(()),
    };

    match queries::get_ownership(pool, user.id, game.igdb_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let embed = create_error_embed(
                "Not in your library",
                &format!("You don't own **{}**, so there is nothing to mark.", game.title),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Ownership lookup failed: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    }

    let (result, confirmation) = match preference {
        Preference::Liked => (
            queries::set_liked_status(pool, user.id, game.igdb_id, true).await,
            format!("You now like **{}**. It will rank higher in suggestions.", game.title),
        ),
        Preference::Disliked => (
            queries::set_disliked_status(pool, user.id, game.igdb_id, true).await,
            format!("You now dislike **{}**. It will rank lower in suggestions.", game.title),
        ),
        Preference::Installed(is_installed) => (
            queries::set_installed_status(pool, user.id, game.igdb_id, is_installed).await,
            if is_installed {
                format!("**{}** is marked as installed.", game.title)
            } else {
                format!("**{}** is no longer marked as installed.", game.title)
            },
        ),
    };

    match result {
        Ok(()) => {
            let embed = create_success_embed("Preference saved", &confirmation);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to save the preference: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Excludes a game from suggestions entirely, for every group you are in
#[poise::command(slash_command)]
pub async fn exclude(
    ctx: Context<'_>,
    #[description = "Title of the game"] title: String,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };
    let game = match find_game(ctx, &title).await? {
        Some(game) => game,
        None => return Ok(()),
    };

    match queries::add_exclusion(pool, user.id, game.igdb_id).await {
        Ok(()) => {
            let embed = create_success_embed(
                "Game excluded",
                &format!("**{}** will never be suggested while your exclusion stands.", game.title),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to exclude the game: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Lifts your exclusion of a game
#[poise::command(slash_command, rename = "include")]
pub async fn include_game(
    ctx: Context<'_>,
    #[description = "Title of the game"] title: String,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };
    let game = match find_game(ctx, &title).await? {
        Some(game) => game,
        None => return Ok(()),
    };

    match queries::remove_exclusion(pool, user.id, game.igdb_id).await {
        Ok(()) => {
            let embed = create_success_embed(
                "Exclusion lifted",
                &format!("**{}** can be suggested again.", game.title),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to lift the exclusion: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}
