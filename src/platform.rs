// platform.rs - Discord Platform Capability
// Everything a command handler is allowed to do against Discord goes through
// the `Platform` trait. `SerenityPlatform` is the production implementation;
// tests swap in a recording fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serenity::builder::{
    CreateApplicationCommand, CreateApplicationCommands, CreateEmbed, CreateInteractionResponse,
};
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::json::{self, Value};
use serenity::model::application::command::{Command, CommandOptionType};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::{Channel, ChannelType, PermissionOverwrite, PermissionOverwriteType};
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use serenity::model::Permissions;

use crate::commands::registry::{CommandDescriptor, ParamKind, RegistrationScope};
use crate::commands::reply::{HelpEmbed, Reply};
use crate::error::BotResult;

/// Identifies the interaction a reply belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

/// A guild member as seen by one lookup. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    pub user_id: UserId,
    /// Voice channel the member is connected to, if any.
    pub voice_channel: Option<ChannelId>,
}

/// The single member mutation a handler may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    Kick,
    Ban,
    AddRole(RoleId),
    RemoveRole(RoleId),
    /// `Some` times the member out for that long, `None` lifts the timeout.
    Timeout(Option<Duration>),
    MoveVoice(ChannelId),
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Look a guild member up by id. Any lookup failure reads as `None`.
    async fn resolve_member(&self, guild_id: GuildId, user_id: UserId) -> Option<ResolvedMember>;

    async fn mutate_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        action: MemberAction,
    ) -> BotResult<()>;

    /// Allow or deny SEND_MESSAGES for `role_id` in `channel_id`, leaving the
    /// rest of that role's overwrite untouched.
    async fn edit_channel_permission(
        &self,
        channel_id: ChannelId,
        role_id: RoleId,
        send_messages: bool,
    ) -> BotResult<()>;

    async fn send_reply(&self, interaction: &InteractionRef, reply: &Reply) -> BotResult<()>;

    /// Replace the remote command list with `commands`.
    async fn register_commands(
        &self,
        scope: RegistrationScope,
        commands: &'static [CommandDescriptor],
    ) -> BotResult<()>;
}

// ============================================================================
// SERENITY IMPLEMENTATION
// ============================================================================

pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    /// Overwrites on `channel_id`, from the cache or, on a miss, from the API.
    async fn channel_overwrites(&self, channel_id: ChannelId) -> BotResult<Vec<PermissionOverwrite>> {
        if let Some(channel) = self.cache.guild_channel(channel_id) {
            return Ok(channel.permission_overwrites);
        }

        log::debug!("Channel {} not cached, fetching it", channel_id);
        match self.http.get_channel(channel_id.0).await? {
            Channel::Guild(channel) => Ok(channel.permission_overwrites),
            _ => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn resolve_member(&self, guild_id: GuildId, user_id: UserId) -> Option<ResolvedMember> {
        if let Err(e) = self.http.get_member(guild_id.0, user_id.0).await {
            log::debug!("Member {} not resolvable in guild {}: {}", user_id, guild_id, e);
            return None;
        }

        let voice_channel = self
            .cache
            .guild_field(guild_id, |guild| {
                guild
                    .voice_states
                    .get(&user_id)
                    .and_then(|state| state.channel_id)
            })
            .flatten();

        Some(ResolvedMember {
            user_id,
            voice_channel,
        })
    }

    async fn mutate_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        action: MemberAction,
    ) -> BotResult<()> {
        match action {
            MemberAction::Kick => guild_id.kick(&self.http, user_id).await?,
            MemberAction::Ban => guild_id.ban(&self.http, user_id, 0).await?,
            MemberAction::AddRole(role_id) => {
                self.http
                    .add_member_role(guild_id.0, user_id.0, role_id.0, None)
                    .await?
            }
            MemberAction::RemoveRole(role_id) => {
                self.http
                    .remove_member_role(guild_id.0, user_id.0, role_id.0, None)
                    .await?
            }
            MemberAction::Timeout(Some(duration)) => {
                let until = timeout_deadline(duration);
                guild_id
                    .edit_member(&self.http, user_id, |m| m.disable_communication_until(until))
                    .await?;
            }
            MemberAction::Timeout(None) => {
                guild_id
                    .edit_member(&self.http, user_id, |m| m.enable_communication())
                    .await?;
            }
            MemberAction::MoveVoice(channel_id) => {
                guild_id.move_member(&self.http, user_id, channel_id).await?;
            }
        }
        Ok(())
    }

    async fn edit_channel_permission(
        &self,
        channel_id: ChannelId,
        role_id: RoleId,
        send_messages: bool,
    ) -> BotResult<()> {
        let overwrites = self.channel_overwrites(channel_id).await?;
        let existing = role_overwrite(overwrites, role_id);

        let overwrite = with_send_messages(existing, role_id, send_messages);
        channel_id.create_permission(&self.http, &overwrite).await?;
        Ok(())
    }

    async fn send_reply(&self, interaction: &InteractionRef, reply: &Reply) -> BotResult<()> {
        let response = interaction_response(reply);
        let body = Value::from(json::hashmap_to_json_map(response.0));
        self.http
            .create_interaction_response(interaction.id, &interaction.token, &body)
            .await?;
        Ok(())
    }

    async fn register_commands(
        &self,
        scope: RegistrationScope,
        commands: &'static [CommandDescriptor],
    ) -> BotResult<()> {
        match scope {
            RegistrationScope::Global => {
                Command::set_global_application_commands(&self.http, |builder| {
                    build_commands(builder, commands)
                })
                .await?;
            }
            RegistrationScope::Guild(guild_id) => {
                guild_id
                    .set_application_commands(&self.http, |builder| build_commands(builder, commands))
                    .await?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// RFC 3339 instant `duration` from now, as Discord expects for
/// `communication_disabled_until`.
fn timeout_deadline(duration: Duration) -> String {
    let duration = chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
    (Utc::now() + duration).to_rfc3339()
}

fn role_overwrite(overwrites: Vec<PermissionOverwrite>, role_id: RoleId) -> Option<PermissionOverwrite> {
    overwrites
        .into_iter()
        .find(|overwrite| overwrite.kind == PermissionOverwriteType::Role(role_id))
}

/// Flip SEND_MESSAGES on a role overwrite, keeping every other bit as it was.
fn with_send_messages(
    existing: Option<PermissionOverwrite>,
    role_id: RoleId,
    send_messages: bool,
) -> PermissionOverwrite {
    let (mut allow, mut deny) = existing
        .map(|overwrite| (overwrite.allow, overwrite.deny))
        .unwrap_or((Permissions::empty(), Permissions::empty()));

    if send_messages {
        allow.insert(Permissions::SEND_MESSAGES);
        deny.remove(Permissions::SEND_MESSAGES);
    } else {
        allow.remove(Permissions::SEND_MESSAGES);
        deny.insert(Permissions::SEND_MESSAGES);
    }

    PermissionOverwrite {
        allow,
        deny,
        kind: PermissionOverwriteType::Role(role_id),
    }
}

fn option_kind(kind: ParamKind) -> CommandOptionType {
    match kind {
        ParamKind::User => CommandOptionType::User,
        ParamKind::Role => CommandOptionType::Role,
        ParamKind::VoiceChannel => CommandOptionType::Channel,
        ParamKind::String => CommandOptionType::String,
    }
}

fn interaction_response<'a>(reply: &Reply) -> CreateInteractionResponse<'a> {
    let mut response = CreateInteractionResponse::default();
    response
        .kind(InteractionResponseType::ChannelMessageWithSource)
        .interaction_response_data(|message| match reply {
            Reply::Message { content, ephemeral } => message.content(content).ephemeral(*ephemeral),
            Reply::Embed(embed) => message.embed(|e| build_embed(e, embed)),
        });
    response
}

fn build_embed<'a>(builder: &'a mut CreateEmbed, embed: &HelpEmbed) -> &'a mut CreateEmbed {
    builder
        .title(&embed.title)
        .description(&embed.description)
        .color(embed.color)
        .footer(|footer| footer.text(&embed.footer))
        .timestamp(embed.timestamp);

    for field in &embed.fields {
        builder.field(&field.name, &field.value, field.inline);
    }

    builder
}

fn build_commands<'a>(
    builder: &'a mut CreateApplicationCommands,
    commands: &[CommandDescriptor],
) -> &'a mut CreateApplicationCommands {
    for descriptor in commands {
        builder.create_application_command(|command| build_command(command, descriptor));
    }
    builder
}

fn build_command<'a>(
    command: &'a mut CreateApplicationCommand,
    descriptor: &CommandDescriptor,
) -> &'a mut CreateApplicationCommand {
    command
        .name(descriptor.name)
        .description(descriptor.description)
        .dm_permission(false);

    if let Some(permission) = descriptor.required_permission {
        command.default_member_permissions(permission.permissions());
    }

    for param in descriptor.parameters {
        command.create_option(|option| {
            option
                .name(param.name)
                .description(param.description)
                .kind(option_kind(param.kind))
                .required(param.required);
            if param.kind == ParamKind::VoiceChannel {
                option.channel_types(&[ChannelType::Voice, ChannelType::Stage]);
            }
            option
        });
    }

    command
}
