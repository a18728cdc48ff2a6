// channel.rs - Channel Lock Commands
// /lockchannel and /unlockchannel flip SEND_MESSAGES for @everyone in the
// channel the command was used in.

use serenity::model::id::RoleId;

use crate::commands::reply::Reply;
use crate::commands::slash::Invocation;
use crate::error::BotResult;
use crate::platform::Platform;

pub async fn lock(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    set_send_messages(platform, invocation, false).await?;
    Ok(Reply::public("🔒 Channel locked."))
}

pub async fn unlock(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    set_send_messages(platform, invocation, true).await?;
    Ok(Reply::public("🔓 Channel unlocked."))
}

async fn set_send_messages(
    platform: &dyn Platform,
    invocation: &Invocation,
    allow: bool,
) -> BotResult<()> {
    let guild_id = invocation.guild()?;
    // @everyone shares its id with the guild
    let everyone = RoleId(guild_id.0);
    platform
        .edit_channel_permission(invocation.channel_id, everyone, allow)
        .await
}
