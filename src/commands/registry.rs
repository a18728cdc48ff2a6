// registry.rs - Command Registry
// The fixed table of slash commands the bot offers and the one-shot
// publication of that table to Discord.
//
// Key Features:
// - Static, ordered command descriptors (name, options, default permission)
// - Exact-match lookup from an invocation's name to a `CommandName`
// - Replace-all publication, at most once per process, failure is non-fatal

use std::sync::atomic::{AtomicBool, Ordering};

use serenity::model::{id::GuildId, Permissions};

use crate::platform::Platform;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Kind of value a command option resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    User,
    Role,
    /// A channel restricted to voice channels.
    VoiceChannel,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

/// Permission a member needs before Discord shows them the command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredPermission {
    KickMembers,
    BanMembers,
    ManageRoles,
    ModerateMembers,
    MoveMembers,
    ManageChannels,
}

impl RequiredPermission {
    pub fn permissions(self) -> Permissions {
        match self {
            RequiredPermission::KickMembers => Permissions::KICK_MEMBERS,
            RequiredPermission::BanMembers => Permissions::BAN_MEMBERS,
            RequiredPermission::ManageRoles => Permissions::MANAGE_ROLES,
            RequiredPermission::ModerateMembers => Permissions::MODERATE_MEMBERS,
            RequiredPermission::MoveMembers => Permissions::MOVE_MEMBERS,
            RequiredPermission::ManageChannels => Permissions::MANAGE_CHANNELS,
        }
    }
}

/// Section of the help embed a command is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpSection {
    Moderation,
    Timeouts,
    Roles,
    VoiceAndChannels,
    Utility,
}

impl HelpSection {
    /// Every section, in the order the help embed shows them.
    pub const ALL: [HelpSection; 5] = [
        HelpSection::Moderation,
        HelpSection::Timeouts,
        HelpSection::Roles,
        HelpSection::VoiceAndChannels,
        HelpSection::Utility,
    ];

    pub fn title(self) -> &'static str {
        match self {
            HelpSection::Moderation => "🔨 Moderation",
            HelpSection::Timeouts => "🔇 Timeouts",
            HelpSection::Roles => "🎭 Roles",
            HelpSection::VoiceAndChannels => "🔊 Voice & Channels",
            HelpSection::Utility => "💬 Utility",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParamDescriptor],
    pub required_permission: Option<RequiredPermission>,
    pub section: HelpSection,
}

const fn param(
    name: &'static str,
    description: &'static str,
    kind: ParamKind,
) -> ParamDescriptor {
    ParamDescriptor {
        name,
        description,
        kind,
        required: true,
    }
}

/// Every command the bot registers, in registration order.
pub const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "kick",
        description: "Kick a member from the server",
        parameters: &[param("target", "User to kick", ParamKind::User)],
        required_permission: Some(RequiredPermission::KickMembers),
        section: HelpSection::Moderation,
    },
    CommandDescriptor {
        name: "ban",
        description: "Ban a member from the server",
        parameters: &[param("target", "User to ban", ParamKind::User)],
        required_permission: Some(RequiredPermission::BanMembers),
        section: HelpSection::Moderation,
    },
    CommandDescriptor {
        name: "say",
        description: "Make the bot say something",
        parameters: &[param("message", "Message to say", ParamKind::String)],
        required_permission: None,
        section: HelpSection::Utility,
    },
    CommandDescriptor {
        name: "giverole",
        description: "Give a role to a user",
        parameters: &[
            param("target", "User to give role", ParamKind::User),
            param("role", "Role to give", ParamKind::Role),
        ],
        required_permission: Some(RequiredPermission::ManageRoles),
        section: HelpSection::Roles,
    },
    CommandDescriptor {
        name: "removerole",
        description: "Remove a role from a user",
        parameters: &[
            param("target", "User to remove role", ParamKind::User),
            param("role", "Role to remove", ParamKind::Role),
        ],
        required_permission: Some(RequiredPermission::ManageRoles),
        section: HelpSection::Roles,
    },
    CommandDescriptor {
        name: "mute",
        description: "Timeout (mute) a user for 10 minutes",
        parameters: &[param("target", "User to mute", ParamKind::User)],
        required_permission: Some(RequiredPermission::ModerateMembers),
        section: HelpSection::Timeouts,
    },
    CommandDescriptor {
        name: "unmute",
        description: "Remove timeout (unmute) from a user",
        parameters: &[param("target", "User to unmute", ParamKind::User)],
        required_permission: Some(RequiredPermission::ModerateMembers),
        section: HelpSection::Timeouts,
    },
    CommandDescriptor {
        name: "move",
        description: "Move a user to another voice channel",
        parameters: &[
            param("target", "User to move", ParamKind::User),
            param("channel", "Voice channel to move to", ParamKind::VoiceChannel),
        ],
        required_permission: Some(RequiredPermission::MoveMembers),
        section: HelpSection::VoiceAndChannels,
    },
    CommandDescriptor {
        name: "lockchannel",
        description: "Lock the current channel (prevent @everyone from sending messages)",
        parameters: &[],
        required_permission: Some(RequiredPermission::ManageChannels),
        section: HelpSection::VoiceAndChannels,
    },
    CommandDescriptor {
        name: "unlockchannel",
        description: "Unlock the current channel (allow @everyone to send messages)",
        parameters: &[],
        required_permission: Some(RequiredPermission::ManageChannels),
        section: HelpSection::VoiceAndChannels,
    },
    CommandDescriptor {
        name: "help",
        description: "Show every command and what it does",
        parameters: &[],
        required_permission: None,
        section: HelpSection::Utility,
    },
];

// ============================================================================
// COMMAND NAMES
// ============================================================================

/// Every command the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum CommandName {
    Kick,
    Ban,
    Say,
    GiveRole,
    RemoveRole,
    Mute,
    Unmute,
    Move,
    LockChannel,
    UnlockChannel,
    Help,
}

impl CommandName {
    /// Every variant, in `COMMANDS` order.
    pub const ALL: [CommandName; 11] = [
        CommandName::Kick,
        CommandName::Ban,
        CommandName::Say,
        CommandName::GiveRole,
        CommandName::RemoveRole,
        CommandName::Mute,
        CommandName::Unmute,
        CommandName::Move,
        CommandName::LockChannel,
        CommandName::UnlockChannel,
        CommandName::Help,
    ];

    /// Case-sensitive lookup of an invocation's command name.
    pub fn from_name(name: &str) -> Option<Self> {
        let command = match name {
            "kick" => CommandName::Kick,
            "ban" => CommandName::Ban,
            "say" => CommandName::Say,
            "giverole" => CommandName::GiveRole,
            "removerole" => CommandName::RemoveRole,
            "mute" => CommandName::Mute,
            "unmute" => CommandName::Unmute,
            "move" => CommandName::Move,
            "lockchannel" => CommandName::LockChannel,
            "unlockchannel" => CommandName::UnlockChannel,
            "help" => CommandName::Help,
            _ => return None,
        };
        Some(command)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Kick => "kick",
            CommandName::Ban => "ban",
            CommandName::Say => "say",
            CommandName::GiveRole => "giverole",
            CommandName::RemoveRole => "removerole",
            CommandName::Mute => "mute",
            CommandName::Unmute => "unmute",
            CommandName::Move => "move",
            CommandName::LockChannel => "lockchannel",
            CommandName::UnlockChannel => "unlockchannel",
            CommandName::Help => "help",
        }
    }

    pub fn descriptor(self) -> &'static CommandDescriptor {
        // Variants are declared in `COMMANDS` order.
        &COMMANDS[self as usize]
    }
}

// ============================================================================
// PUBLICATION
// ============================================================================

/// Where the command list is published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationScope {
    /// Visible in every guild the bot is installed in.
    Global,
    /// Visible only in one guild; updates show up immediately.
    Guild(GuildId),
}

/// Publishes `COMMANDS` once for the lifetime of the process.
pub struct CommandRegistry {
    scope: RegistrationScope,
    published: AtomicBool,
}

impl CommandRegistry {
    pub fn new(scope: RegistrationScope) -> Self {
        Self {
            scope,
            published: AtomicBool::new(false),
        }
    }

    /// Replace the remote command list with `COMMANDS`.
    ///
    /// Only the first call does anything; later calls (the gateway fires
    /// `ready` again after a reconnect) return `false` immediately. A failed
    /// publish is logged and not retried.
    pub async fn publish(&self, platform: &dyn Platform) -> bool {
        if self.published.swap(true, Ordering::SeqCst) {
            log::debug!("Commands already published, skipping");
            return false;
        }

        match platform.register_commands(self.scope, COMMANDS).await {
            Ok(()) => log::info!("📤 Commands registered ({} commands, {:?})", COMMANDS.len(), self.scope),
            Err(e) => log::error!("❌ Command registration failed: {}", e),
        }
        true
    }
}
