// say.rs - Say Command Module
// This module implements /say, which repeats the given text back into the
// channel as the bot.
//
// Used by: slash.rs (dispatch table)

use crate::commands::reply::Reply;
use crate::commands::slash::Invocation;
use crate::error::BotResult;

/// Echo the `message` option verbatim; touches nothing on the server.
pub fn say(invocation: &Invocation) -> BotResult<Reply> {
    let text = invocation.string("message")?;
    Ok(Reply::public(text))
}
