// slash.rs - Slash Command Dispatcher
// This module turns an incoming application-command interaction into an
// `Invocation`, routes it to the handler for its command, and sends the one
// reply that handler produced.
//
// Key Features:
// - Enum-keyed dispatch table, exhaustively matched
// - Unknown command names are ignored without a reply
// - Any handler error becomes a single "❌ Error: ..." reply and never escapes

use std::collections::HashMap;

use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOptionValue,
};
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};
use serenity::model::user::User;

use crate::commands::registry::CommandName;
use crate::commands::reply::Reply;
use crate::commands::{channel, help, moderation, say};
use crate::error::{BotError, BotResult};
use crate::platform::{InteractionRef, Platform};

// ============================================================================
// INVOCATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: UserId,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRef {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
}

/// An option value, already resolved by Discord
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    User(UserRef),
    Role(RoleRef),
    Channel(ChannelRef),
    String(String),
}

/// One slash command call, owned by the task handling it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command_name: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub invoker: UserId,
    pub interaction: InteractionRef,
    pub arguments: HashMap<String, ArgumentValue>,
}

impl Invocation {
    pub fn from_interaction(interaction: &ApplicationCommandInteraction) -> Self {
        let mut arguments = HashMap::new();

        for option in &interaction.data.options {
            let value = match &option.resolved {
                Some(CommandDataOptionValue::User(user, _)) => ArgumentValue::User(UserRef {
                    id: user.id,
                    tag: user_tag(user),
                }),
                Some(CommandDataOptionValue::Role(role)) => ArgumentValue::Role(RoleRef {
                    id: role.id,
                    name: role.name.clone(),
                }),
                Some(CommandDataOptionValue::Channel(channel)) => {
                    ArgumentValue::Channel(ChannelRef {
                        id: channel.id,
                        name: channel.name.clone().unwrap_or_default(),
                    })
                }
                Some(CommandDataOptionValue::String(text)) => ArgumentValue::String(text.clone()),
                // No registered command declares any other option kind.
                _ => continue,
            };
            arguments.insert(option.name.clone(), value);
        }

        Self {
            command_name: interaction.data.name.clone(),
            guild_id: interaction.guild_id,
            channel_id: interaction.channel_id,
            invoker: interaction.user.id,
            interaction: InteractionRef {
                id: interaction.id.0,
                token: interaction.token.clone(),
            },
            arguments,
        }
    }

    /// Guild the command was used in; guild-only commands fail outside one.
    pub fn guild(&self) -> BotResult<GuildId> {
        self.guild_id.ok_or(BotError::NotInGuild)
    }

    fn argument(&self, name: &'static str) -> BotResult<&ArgumentValue> {
        self.arguments
            .get(name)
            .ok_or(BotError::MissingArgument(name))
    }

    pub fn user(&self, name: &'static str) -> BotResult<&UserRef> {
        match self.argument(name)? {
            ArgumentValue::User(user) => Ok(user),
            _ => Err(BotError::WrongArgumentType(name)),
        }
    }

    pub fn role(&self, name: &'static str) -> BotResult<&RoleRef> {
        match self.argument(name)? {
            ArgumentValue::Role(role) => Ok(role),
            _ => Err(BotError::WrongArgumentType(name)),
        }
    }

    pub fn channel(&self, name: &'static str) -> BotResult<&ChannelRef> {
        match self.argument(name)? {
            ArgumentValue::Channel(channel) => Ok(channel),
            _ => Err(BotError::WrongArgumentType(name)),
        }
    }

    pub fn string(&self, name: &'static str) -> BotResult<&str> {
        match self.argument(name)? {
            ArgumentValue::String(text) => Ok(text),
            _ => Err(BotError::WrongArgumentType(name)),
        }
    }
}

/// `name#1234` for accounts that still have a discriminator, the bare
/// username for accounts on the new username system (discriminator 0).
fn user_tag(user: &User) -> String {
    if user.discriminator == 0 {
        user.name.clone()
    } else {
        user.tag()
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command name is not one of ours; nothing was sent.
    Ignored,
    Replied,
    /// The handler ran but its reply could not be delivered.
    ReplyFailed,
}

/// Handle one invocation: at most one mutation, then exactly one reply.
pub async fn dispatch(platform: &dyn Platform, invocation: &Invocation) -> DispatchOutcome {
    let Some(command) = CommandName::from_name(&invocation.command_name) else {
        log::debug!("Ignoring unknown command '{}'", invocation.command_name);
        return DispatchOutcome::Ignored;
    };

    let reply = match run_command(platform, command, invocation).await {
        Ok(reply) => {
            log::info!(
                "Processed command '{}' for user {}",
                command.as_str(),
                invocation.invoker
            );
            reply
        }
        Err(e) => {
            log::error!(
                "❌ Command '{}' failed for user {}: {:?}",
                command.as_str(),
                invocation.invoker,
                e
            );
            Reply::ephemeral(format!("❌ Error: {}", e))
        }
    };

    match platform.send_reply(&invocation.interaction, &reply).await {
        Ok(()) => DispatchOutcome::Replied,
        Err(e) => {
            log::error!(
                "❌ Failed to reply to command '{}': {}",
                command.as_str(),
                e
            );
            DispatchOutcome::ReplyFailed
        }
    }
}

async fn run_command(
    platform: &dyn Platform,
    command: CommandName,
    invocation: &Invocation,
) -> BotResult<Reply> {
    match command {
        CommandName::Kick => moderation::kick(platform, invocation).await,
        CommandName::Ban => moderation::ban(platform, invocation).await,
        CommandName::GiveRole => moderation::give_role(platform, invocation).await,
        CommandName::RemoveRole => moderation::remove_role(platform, invocation).await,
        CommandName::Mute => moderation::mute(platform, invocation).await,
        CommandName::Unmute => moderation::unmute(platform, invocation).await,
        CommandName::Move => moderation::move_member(platform, invocation).await,
        CommandName::LockChannel => channel::lock(platform, invocation).await,
        CommandName::UnlockChannel => channel::unlock(platform, invocation).await,
        CommandName::Say => say::say(invocation),
        CommandName::Help => Ok(help::help_reply()),
    }
}
