// error.rs - Error Types
// Every fallible path in the bot funnels into `BotError`. The dispatcher turns
// whatever reaches it into a single "❌ Error: ..." reply.

/// General error type for the bot
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Neither `DISCORD_TOKEN` nor `TOKEN` is set.
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
    /// The token still holds the placeholder from the sample config.
    #[error("DISCORD_TOKEN is set to a placeholder value")]
    PlaceholderToken,
    /// A configuration value could not be parsed.
    #[error("invalid value `{value}` for {key}")]
    InvalidConfig { key: &'static str, value: String },
    /// A required command option was absent from the invocation.
    #[error("missing required option `{0}`")]
    MissingArgument(&'static str),
    /// A command option resolved to a different kind than its descriptor declares.
    #[error("option `{0}` has the wrong type")]
    WrongArgumentType(&'static str),
    /// A guild-only command was invoked outside of a guild.
    #[error("this command can only be used inside a server")]
    NotInGuild,
    /// Errors relating to the `serenity` crate.
    #[error(transparent)]
    Serenity(#[from] serenity::Error),
}

pub type BotResult<T> = Result<T, BotError>;
