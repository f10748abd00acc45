use crate::bot::commands::games::{author_user, find_game};
use crate::bot::{Context, Error};
use crate::database::queries;
use crate::utils::format::{create_error_embed, create_success_embed};
use chrono::{NaiveDate, NaiveTime, Utc};

/// Schedules a game night
#[poise::command(slash_command)]
pub async fn plan_gamenight(
    ctx: Context<'_>,
    #[description = "Date, YYYY-MM-DD"] date: String,
    #[description = "Time (UTC), HH:MM"] time: String,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    let scheduled_time = match (
        NaiveDate::parse_from_str(&date, "%Y-%m-%d"),
        NaiveTime::parse_from_str(&time, "%H:%M"),
    ) {
        (Ok(date), Ok(time)) => date.and_time(time).and_utc(),
        _ => {
            let embed = create_error_embed(
                "Invalid date or time",
                "Use `YYYY-MM-DD` for the date and `HH:MM` (UTC) for the time.",
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    let channel_id = ctx.channel_id().to_string();
    match queries::create_game_night(pool, user.id, scheduled_time, &channel_id).await {
        Ok(game_night) => {
            let embed = create_success_embed(
                "Game night planned",
                &format!(
                    "Game night #{} is scheduled for **{}**. Run `/suggest` closer to the day!",
                    game_night.id,
                    scheduled_time.format("%Y-%m-%d %H:%M UTC"),
                ),
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to plan the game night: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Records the game chosen for the latest game night
#[poise::command(slash_command)]
pub async fn pick_game(
    ctx: Context<'_>,
    #[description = "Title of the chosen game"] title: String,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let game_night = match queries::get_latest_game_night(pool).await {
        Ok(Some(game_night)) => game_night,
        Ok(None) => {
            let embed = create_error_embed(
                "No game night",
                "Nothing is scheduled yet. Plan one with `/plan_gamenight` first.",
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to load game nights: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    let game = match find_game(ctx, &title).await? {
        Some(game) => game,
        None => return Ok(()),
    };

    if let Err(e) = queries::set_selected_game(pool, game_night.id, game.igdb_id).await {
        let embed = create_error_embed("Error", &format!("Failed to record the pick: {}", e));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    // The played stamp feeds the recency decay next time around
    if let Err(e) = queries::mark_game_played(pool, game.igdb_id, Utc::now()).await {
        let embed = create_error_embed("Error", &format!("Failed to stamp the game as played: {}", e));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let embed = create_success_embed(
        "Pick recorded",
        &format!("**{}** is the game for game night #{}. Have fun!", game.title, game_night.id),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
