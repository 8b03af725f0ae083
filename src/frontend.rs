//! Message frontend: addressing, argv decoding, and the per-invocation
//! error boundary.

use std::sync::Arc;

use gallium_cmd::{argv, AmbientArgs, Environment, InvokeError, Registry};
use regex::Regex;
use tracing::{debug, error};

use crate::config::Config;
use crate::console::ConsoleEnvironment;

/// Command used when the bot is addressed with no text at all.
const EMPTY_MESSAGE_COMMAND: &str = "ping";

/// One inbound message with its attribution.
pub struct Inbound<'a> {
    /// Raw message text.
    pub content: &'a str,
    /// User id of the sender.
    pub author: &'a str,
    /// Channel the message arrived on.
    pub channel: &'a str,
    /// Whether the channel is a direct (one-to-one) conversation.
    pub direct: bool,
}

/// Routes inbound messages to the command registry.
pub struct Frontend {
    config: Arc<Config>,
    registry: Arc<Registry>,
    ambient: AmbientArgs,
    mention: Regex,
}

impl Frontend {
    /// Build a frontend over a finished registry.
    pub fn new(config: Arc<Config>, registry: Arc<Registry>, ambient: AmbientArgs) -> Self {
        Frontend {
            config,
            registry,
            ambient,
            mention: Regex::new(r"^<@!?(\d+)>[,:]?\s+").expect("static pattern"),
        }
    }

    /// Process one message end to end, replying on the console.
    pub async fn on_message(&self, msg: &Inbound<'_>) {
        let mut env = ConsoleEnvironment::new(&self.config, msg.author, msg.direct);
        self.handle(msg, &mut env).await;
    }

    /// Process one message against an arbitrary environment. Returns whether
    /// the message was addressed to us at all.
    pub async fn handle(&self, msg: &Inbound<'_>, env: &mut dyn Environment) -> bool {
        if msg.author == self.config.bot.user_id {
            return false;
        }
        let Some(body) = self.addressed_body(msg) else {
            return false;
        };

        let (name, args) = match split_invocation(body) {
            Some(split) => split,
            // Addressed with nothing to say: prove liveness instead.
            None => (EMPTY_MESSAGE_COMMAND.to_owned(), Vec::new()),
        };

        debug!(command = %name, author = %msg.author, channel = %msg.channel, "dispatching");

        if let Err(err) = self.registry.invoke(&name, &args, &self.ambient, env).await {
            if err.is_user_facing() {
                let _ = env.reply(&render_failure(&err)).await;
            } else {
                error!(
                    command = %name,
                    author = %msg.author,
                    channel = %msg.channel,
                    input = %msg.content,
                    error = %err,
                    "command failed"
                );
                let _ = env.reply("Internal error.").await;
            }
        }
        true
    }

    /// The command text this message carries for us, with any addressing
    /// mention stripped. `None` means the message is not ours to answer.
    fn addressed_body<'m>(&self, msg: &Inbound<'m>) -> Option<&'m str> {
        match self.mention.captures(msg.content) {
            Some(caps) if caps[1] == self.config.bot.user_id => {
                Some(&msg.content[caps[0].len()..])
            }
            // A mention of somebody else is never for us, even in a direct
            // conversation.
            Some(_) => None,
            None if msg.direct => Some(msg.content),
            None => None,
        }
    }
}

/// Split a message body into the command name and its decoded argv.
fn split_invocation(body: &str) -> Option<(String, Vec<String>)> {
    let mut tokens = argv::decode(body).into_iter();
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

/// User-facing rendering of a failed invocation.
fn render_failure(err: &InvokeError) -> String {
    let kind = err.kind();
    let message = err.user_message();
    match err.subject() {
        Some(subject) => format!("Error `{kind}` on {subject}: {message}"),
        None => format!("Error `{kind}`: {message}"),
    }
}
