// help.rs - Help Command Module
// Renders /help as an embed with one field per help section, generated from
// the command registry so the two never drift apart.

use serenity::model::Timestamp;

use crate::commands::registry::{CommandDescriptor, CommandName, HelpSection, RequiredPermission};
use crate::commands::reply::{EmbedField, HelpEmbed, Reply};

const HELP_COLOR: u32 = 0x5865F2;

pub fn help_reply() -> Reply {
    Reply::Embed(help_embed())
}

pub fn help_embed() -> HelpEmbed {
    let fields = HelpSection::ALL
        .iter()
        .map(|section| EmbedField {
            name: section.title().to_string(),
            value: section_lines(*section),
            inline: false,
        })
        .collect();

    HelpEmbed {
        title: "🛡️ Gavel Bot - Command Help".to_string(),
        description: "Moderation commands are only shown to members holding the permission listed next to them."
            .to_string(),
        color: HELP_COLOR,
        fields,
        footer: format!("Gavel Bot v{}", env!("CARGO_PKG_VERSION")),
        timestamp: Timestamp::now(),
    }
}

fn section_lines(section: HelpSection) -> String {
    CommandName::ALL
        .iter()
        .map(|command| command.descriptor())
        .filter(|descriptor| descriptor.section == section)
        .map(usage_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `• `/giverole <target> <role>` - Give a role to a user *(Manage Roles)*`
fn usage_line(command: &CommandDescriptor) -> String {
    let mut usage = format!("/{}", command.name);
    for param in command.parameters {
        usage.push_str(&format!(" <{}>", param.name));
    }

    let mut line = format!("• `{}` - {}", usage, command.description);
    if let Some(permission) = command.required_permission {
        line.push_str(&format!(" *({})*", permission_label(permission)));
    }
    line
}

fn permission_label(permission: RequiredPermission) -> &'static str {
    match permission {
        RequiredPermission::KickMembers => "Kick Members",
        RequiredPermission::BanMembers => "Ban Members",
        RequiredPermission::ManageRoles => "Manage Roles",
        RequiredPermission::ModerateMembers => "Timeout Members",
        RequiredPermission::MoveMembers => "Move Members",
        RequiredPermission::ManageChannels => "Manage Channels",
    }
}
