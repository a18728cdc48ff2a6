// test_support.rs - Recording Platform Fake
// Records every call a handler makes so tests can assert on the exact
// sequence of lookups, mutations and replies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};

use crate::commands::registry::{CommandDescriptor, RegistrationScope};
use crate::commands::reply::Reply;
use crate::commands::slash::{ArgumentValue, ChannelRef, Invocation, RoleRef, UserRef};
use crate::error::{BotError, BotResult};
use crate::platform::{InteractionRef, MemberAction, Platform, ResolvedMember};

pub const GUILD: GuildId = GuildId(100);
pub const CHANNEL: ChannelId = ChannelId(200);

/// A failure shaped like one coming back from serenity.
pub fn remote_error(message: &'static str) -> BotError {
    BotError::Serenity(serenity::Error::Other(message))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolveMember(GuildId, UserId),
    MutateMember(GuildId, UserId, MemberAction),
    EditChannelPermission {
        channel_id: ChannelId,
        role_id: RoleId,
        send_messages: bool,
    },
    SendReply(Reply),
    RegisterCommands {
        scope: RegistrationScope,
        names: Vec<String>,
    },
}

#[derive(Default)]
pub struct RecordingPlatform {
    members: HashMap<UserId, ResolvedMember>,
    fail_mutations: Option<&'static str>,
    fail_replies: bool,
    fail_registration: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `user_id` resolvable, optionally connected to a voice channel.
    pub fn with_member(mut self, user_id: u64, voice_channel: Option<u64>) -> Self {
        self.members.insert(
            UserId(user_id),
            ResolvedMember {
                user_id: UserId(user_id),
                voice_channel: voice_channel.map(ChannelId),
            },
        );
        self
    }

    /// Every mutation fails with `message`.
    pub fn failing_mutations(mut self, message: &'static str) -> Self {
        self.fail_mutations = Some(message);
        self
    }

    pub fn failing_replies(mut self) -> Self {
        self.fail_replies = true;
        self
    }

    pub fn failing_registration(mut self) -> Self {
        self.fail_registration = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendReply(reply) => Some(reply),
                _ => None,
            })
            .collect()
    }

    /// Mutations and channel permission edits, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::MutateMember(..) | Call::EditChannelPermission { .. }
                )
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self) -> BotResult<()> {
        match self.fail_mutations {
            Some(message) => Err(remote_error(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn resolve_member(&self, guild_id: GuildId, user_id: UserId) -> Option<ResolvedMember> {
        self.record(Call::ResolveMember(guild_id, user_id));
        self.members.get(&user_id).cloned()
    }

    async fn mutate_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        action: MemberAction,
    ) -> BotResult<()> {
        self.record(Call::MutateMember(guild_id, user_id, action));
        self.mutation_result()
    }

    async fn edit_channel_permission(
        &self,
        channel_id: ChannelId,
        role_id: RoleId,
        send_messages: bool,
    ) -> BotResult<()> {
        self.record(Call::EditChannelPermission {
            channel_id,
            role_id,
            send_messages,
        });
        self.mutation_result()
    }

    async fn send_reply(&self, _interaction: &InteractionRef, reply: &Reply) -> BotResult<()> {
        self.record(Call::SendReply(reply.clone()));
        if self.fail_replies {
            return Err(remote_error("Unknown interaction"));
        }
        Ok(())
    }

    async fn register_commands(
        &self,
        scope: RegistrationScope,
        commands: &'static [CommandDescriptor],
    ) -> BotResult<()> {
        self.record(Call::RegisterCommands {
            scope,
            names: commands.iter().map(|c| c.name.to_string()).collect(),
        });
        if self.fail_registration {
            return Err(remote_error("401: Unauthorized"));
        }
        Ok(())
    }
}

// ============================================================================
// INVOCATION BUILDER
// ============================================================================

/// Build a guild invocation of `command_name` in `CHANNEL`.
pub fn invocation(command_name: &str) -> Invocation {
    Invocation {
        command_name: command_name.to_string(),
        guild_id: Some(GUILD),
        channel_id: CHANNEL,
        invoker: UserId(1),
        interaction: InteractionRef {
            id: 9000,
            token: "interaction-token".to_string(),
        },
        arguments: HashMap::new(),
    }
}

pub trait InvocationExt {
    fn with_user(self, name: &str, id: u64, tag: &str) -> Self;
    fn with_role(self, name: &str, id: u64, role_name: &str) -> Self;
    fn with_channel(self, name: &str, id: u64, channel_name: &str) -> Self;
    fn with_string(self, name: &str, value: &str) -> Self;
    fn outside_guild(self) -> Self;
}

impl InvocationExt for Invocation {
    fn with_user(mut self, name: &str, id: u64, tag: &str) -> Self {
        self.arguments.insert(
            name.to_string(),
            ArgumentValue::User(UserRef {
                id: UserId(id),
                tag: tag.to_string(),
            }),
        );
        self
    }

    fn with_role(mut self, name: &str, id: u64, role_name: &str) -> Self {
        self.arguments.insert(
            name.to_string(),
            ArgumentValue::Role(RoleRef {
                id: RoleId(id),
                name: role_name.to_string(),
            }),
        );
        self
    }

    fn with_channel(mut self, name: &str, id: u64, channel_name: &str) -> Self {
        self.arguments.insert(
            name.to_string(),
            ArgumentValue::Channel(ChannelRef {
                id: ChannelId(id),
                name: channel_name.to_string(),
            }),
        );
        self
    }

    fn with_string(mut self, name: &str, value: &str) -> Self {
        self.arguments
            .insert(name.to_string(), ArgumentValue::String(value.to_string()));
        self
    }

    fn outside_guild(mut self) -> Self {
        self.guild_id = None;
        self
    }
}
