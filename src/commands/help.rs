use crate::commands::context::Context;
use crate::commands::giveaway::formatters;
use crate::error::Result;

// Prints the embed with all available commands. Unlike the rest of
// the command surface this one is available everywhere.
#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    let embed = formatters::help_embed(&ctx.data().command_prefix);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
