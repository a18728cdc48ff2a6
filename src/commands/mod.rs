// commands/mod.rs - Command Module Registry
// This file declares all command modules. `slash` owns dispatch, `registry`
// owns the command table, the rest hold the handlers.

pub mod registry;       // Command descriptors and one-shot registration
pub mod reply;          // Reply payloads sent back to Discord
pub mod slash;          // Invocation parsing and the dispatch table
pub mod moderation;     // kick, ban, roles, timeouts, voice move
pub mod channel;        // lockchannel / unlockchannel
pub mod say;            // say
pub mod help;           // help embed

#[cfg(test)]
pub mod test_support;
