//! Liveness check.

use async_trait::async_trait;
use gallium_cmd::{Args, Command, CommandDef, CommandResult, Environment, Permission};

/// Answers with a fixed string. Also the implicit command behind an empty
/// addressed message.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn def(&self) -> CommandDef {
        CommandDef::new("ping")
            .describe("Check whether the bot is alive")
            .permission(Permission::Anyone)
    }

    async fn run(&self, _args: Args, env: &mut dyn Environment) -> CommandResult {
        env.reply("Pong!").await
    }
}
