use crate::bot::commands::games::author_user;
use crate::bot::{Context, Error};
use crate::database::queries;
use crate::utils::days::{format_days, parse_days, to_storage};
use crate::utils::format::{create_error_embed, create_info_embed, create_success_embed};
use std::collections::BTreeSet;

/// Sets the weekdays you are recurringly free for game nights
#[poise::command(slash_command)]
pub async fn set_availability(
    ctx: Context<'_>,
    #[description = "Free days, e.g. 'mon,wed,fri' or '0,2,4' (0=Monday)"] days: String,
) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    let parsed = match parse_days(&days) {
        Ok(parsed) => parsed,
        Err(e) => {
            let embed = create_error_embed("Invalid days", &e.to_string());
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    let storage = to_storage(&parsed);
    match queries::set_weekly_availability(pool, user.id, Some(&storage)).await {
        Ok(()) => {
            let description = if parsed.is_empty() {
                "You are now marked as never available. Use `/clear_availability` to undo."
                    .to_string()
            } else {
                format!("You are free on: **{}**", format_days(&parsed))
            };
            let embed = create_success_embed("Availability saved", &description);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to save availability: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Shows your recurring weekly availability
#[poise::command(slash_command)]
pub async fn my_availability(ctx: Context<'_>) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    match queries::get_weekly_availability(pool, user.id).await {
        Ok(Some(row)) => {
            let days: BTreeSet<u32> = row.day_set().into_iter().collect();
            let description = if days.is_empty() {
                "You are marked as never available.".to_string()
            } else {
                format!("You are free on: **{}**", format_days(&days))
            };
            let embed = create_info_embed("Your availability", &description);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Ok(None) => {
            let embed = create_info_embed(
                "Your availability",
                "No pattern set, so you count as available every day.",
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to load availability: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}

/// Removes your availability pattern, counting you as always available
#[poise::command(slash_command)]
pub async fn clear_availability(ctx: Context<'_>) -> Result<(), Error> {
    let pool = &ctx.data().pool;

    let user = match author_user(ctx).await? {
        Some(user) => user,
        None => return Ok(()),
    };

    match queries::clear_weekly_availability(pool, user.id).await {
        Ok(()) => {
            let embed = create_success_embed(
                "Availability cleared",
                "You now count as available every day.",
            );
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            let embed = create_error_embed("Error", &format!("Failed to clear availability: {}", e));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
    }

    Ok(())
}
