// moderation.rs - Member Moderation Commands
// /kick, /ban, /giverole, /removerole, /mute, /unmute and /move.
//
// Each handler resolves its target member once, performs a single mutation
// and returns the reply. A target that cannot be resolved gets the fixed
// "not found" reply and nothing is changed.

use std::time::Duration;

use crate::commands::reply::Reply;
use crate::commands::slash::{Invocation, UserRef};
use crate::error::BotResult;
use crate::platform::{MemberAction, Platform, ResolvedMember};

pub const USER_NOT_FOUND: &str = "⚠️ User not found.";
pub const NOT_IN_VOICE: &str = "⚠️ User not in a voice channel.";

/// How long /mute times a member out for.
pub const MUTE_DURATION: Duration = Duration::from_secs(10 * 60);

/// Resolve the `target` option, apply `action` to it and reply with
/// `success(target)`.
async fn act_on_target<F>(
    platform: &dyn Platform,
    invocation: &Invocation,
    action: MemberAction,
    success: F,
) -> BotResult<Reply>
where
    F: FnOnce(&UserRef) -> String,
{
    let guild_id = invocation.guild()?;
    let target = invocation.user("target")?;

    let Some(member) = platform.resolve_member(guild_id, target.id).await else {
        return Ok(Reply::ephemeral(USER_NOT_FOUND));
    };

    platform
        .mutate_member(guild_id, member.user_id, action)
        .await?;
    Ok(Reply::public(success(target)))
}

pub async fn kick(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    act_on_target(platform, invocation, MemberAction::Kick, |target| {
        format!("✅ Kicked {}", target.tag)
    })
    .await
}

pub async fn ban(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    act_on_target(platform, invocation, MemberAction::Ban, |target| {
        format!("✅ Banned {}", target.tag)
    })
    .await
}

pub async fn give_role(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    let role = invocation.role("role")?;
    act_on_target(platform, invocation, MemberAction::AddRole(role.id), |target| {
        format!("✅ Added role {} to {}", role.name, target.tag)
    })
    .await
}

pub async fn remove_role(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    let role = invocation.role("role")?;
    act_on_target(platform, invocation, MemberAction::RemoveRole(role.id), |target| {
        format!("✅ Removed role {} from {}", role.name, target.tag)
    })
    .await
}

pub async fn mute(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    act_on_target(
        platform,
        invocation,
        MemberAction::Timeout(Some(MUTE_DURATION)),
        |target| format!("✅ Muted {} for 10 minutes", target.tag),
    )
    .await
}

pub async fn unmute(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    act_on_target(platform, invocation, MemberAction::Timeout(None), |target| {
        format!("✅ Unmuted {}", target.tag)
    })
    .await
}

/// Move the target to another voice channel. The target has to be connected
/// to voice already; Discord cannot pull members into a call.
pub async fn move_member(platform: &dyn Platform, invocation: &Invocation) -> BotResult<Reply> {
    let guild_id = invocation.guild()?;
    let target = invocation.user("target")?;
    let channel = invocation.channel("channel")?;

    let member = match platform.resolve_member(guild_id, target.id).await {
        Some(member @ ResolvedMember { voice_channel: Some(_), .. }) => member,
        Some(_) => return Ok(Reply::ephemeral(NOT_IN_VOICE)),
        None => return Ok(Reply::ephemeral(USER_NOT_FOUND)),
    };

    platform
        .mutate_member(guild_id, member.user_id, MemberAction::MoveVoice(channel.id))
        .await?;
    Ok(Reply::public(format!("✅ Moved {} to {}", target.tag, channel.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::slash::{dispatch, DispatchOutcome};
    use crate::commands::test_support::*;
    use serenity::model::id::{ChannelId, RoleId, UserId};

    #[tokio::test]
    async fn test_kick_resolves_then_kicks() {
        let platform = RecordingPlatform::new().with_member(5, None);
        let reply = kick(&platform, &invocation("kick").with_user("target", 5, "spammer#1234"))
            .await
            .unwrap();

        assert_eq!(reply, Reply::public("✅ Kicked spammer#1234"));
        assert_eq!(
            platform.calls()[..2],
            [
                Call::ResolveMember(GUILD, UserId(5)),
                Call::MutateMember(GUILD, UserId(5), MemberAction::Kick),
            ]
        );
    }

    #[tokio::test]
    async fn test_ban() {
        let platform = RecordingPlatform::new().with_member(5, None);
        let reply = ban(&platform, &invocation("ban").with_user("target", 5, "spammer#1234"))
            .await
            .unwrap();

        assert_eq!(reply, Reply::public("✅ Banned spammer#1234"));
        assert_eq!(
            platform.mutations(),
            vec![Call::MutateMember(GUILD, UserId(5), MemberAction::Ban)]
        );
    }

    #[tokio::test]
    async fn test_role_grant_and_revoke() {
        let platform = RecordingPlatform::new().with_member(5, None);

        let granted = give_role(
            &platform,
            &invocation("giverole").with_user("target", 5, "helper#0001").with_role("role", 42, "Helper"),
        )
        .await
        .unwrap();
        let revoked = remove_role(
            &platform,
            &invocation("removerole").with_user("target", 5, "helper#0001").with_role("role", 42, "Helper"),
        )
        .await
        .unwrap();

        assert_eq!(granted, Reply::public("✅ Added role Helper to helper#0001"));
        assert_eq!(revoked, Reply::public("✅ Removed role Helper from helper#0001"));
        assert_eq!(
            platform.mutations(),
            vec![
                Call::MutateMember(GUILD, UserId(5), MemberAction::AddRole(RoleId(42))),
                Call::MutateMember(GUILD, UserId(5), MemberAction::RemoveRole(RoleId(42))),
            ]
        );
    }

    #[tokio::test]
    async fn test_mute_is_ten_minutes_and_unmute_clears() {
        let platform = RecordingPlatform::new().with_member(5, None);

        let muted = mute(&platform, &invocation("mute").with_user("target", 5, "loud#0001"))
            .await
            .unwrap();
        let unmuted = unmute(&platform, &invocation("unmute").with_user("target", 5, "loud#0001"))
            .await
            .unwrap();

        assert_eq!(muted, Reply::public("✅ Muted loud#0001 for 10 minutes"));
        assert_eq!(unmuted, Reply::public("✅ Unmuted loud#0001"));
        assert_eq!(
            platform.mutations(),
            vec![
                Call::MutateMember(
                    GUILD,
                    UserId(5),
                    MemberAction::Timeout(Some(Duration::from_secs(600)))
                ),
                Call::MutateMember(GUILD, UserId(5), MemberAction::Timeout(None)),
            ]
        );
    }

    #[tokio::test]
    async fn test_unresolvable_target_is_not_found_for_every_member_command() {
        for name in ["kick", "ban", "giverole", "removerole", "mute", "unmute", "move"] {
            let platform = RecordingPlatform::new();
            let inv = invocation(name)
                .with_user("target", 404, "ghost#0000")
                .with_role("role", 42, "Helper")
                .with_channel("channel", 7, "Lounge");

            let outcome = dispatch(&platform, &inv).await;

            assert_eq!(outcome, DispatchOutcome::Replied);
            assert_eq!(platform.replies(), vec![Reply::ephemeral(USER_NOT_FOUND)], "/{}", name);
            assert!(platform.mutations().is_empty(), "/{}", name);
        }
    }

    #[tokio::test]
    async fn test_move_requires_voice_connection() {
        let platform = RecordingPlatform::new().with_member(5, None);
        let reply = move_member(
            &platform,
            &invocation("move").with_user("target", 5, "afk#0001").with_channel("channel", 7, "Lounge"),
        )
        .await
        .unwrap();

        assert_eq!(reply, Reply::ephemeral(NOT_IN_VOICE));
        assert!(platform.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_move_connected_member() {
        let platform = RecordingPlatform::new().with_member(5, Some(3));
        let reply = move_member(
            &platform,
            &invocation("move").with_user("target", 5, "gamer#0001").with_channel("channel", 7, "Lounge"),
        )
        .await
        .unwrap();

        assert_eq!(reply, Reply::public("✅ Moved gamer#0001 to Lounge"));
        assert_eq!(
            platform.mutations(),
            vec![Call::MutateMember(
                GUILD,
                UserId(5),
                MemberAction::MoveVoice(ChannelId(7))
            )]
        );
    }

    #[tokio::test]
    async fn test_mutation_error_propagates_to_dispatcher() {
        let platform = RecordingPlatform::new()
            .with_member(5, None)
            .failing_mutations("Missing Permissions");
        let result = kick(&platform, &invocation("kick").with_user("target", 5, "mod#0001")).await;

        assert_eq!(result.unwrap_err().to_string(), "Missing Permissions");
    }
}
