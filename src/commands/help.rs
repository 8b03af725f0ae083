//! Command listing and per-command usage.

use async_trait::async_trait;
use gallium_cmd::{
    help, Args, Command, CommandDef, CommandResult, Environment, Param, Permission, Registry,
};

/// Lists every registered command, or explains one of them.
///
/// The registry is injected as an ambient argument; the command never owns
/// it.
pub struct Help;

#[async_trait]
impl Command for Help {
    fn def(&self) -> CommandDef {
        CommandDef::new("help")
            .describe("List commands, or show usage for one command")
            .permission(Permission::Anyone)
            .param(
                Param::positional(0, "command", gallium_cmd::convert::name)
                    .describe("Command to explain")
                    .optional(),
            )
            .param(Param::ambient("registry"))
    }

    async fn run(&self, args: Args, env: &mut dyn Environment) -> CommandResult {
        let registry = args
            .shared::<Registry>("registry")
            .ok_or_else(|| anyhow::anyhow!("registry handle missing"))?;

        let mut sink = env.reply_long();
        match args.str("command") {
            Some(wanted) => {
                let Some(def) = registry.get(wanted) else {
                    return env.reply("No such command.").await;
                };
                sink.push(format!("{} - {}\n", help::usage_line(&def), def.description));
                sink.extend(
                    help::parameter_lines(&def)
                        .into_iter()
                        .map(|line| format!("{line}\n")),
                );
            }
            None => {
                let mut defs: Vec<_> = registry.defs().collect();
                defs.sort_by(|a, b| a.name.cmp(&b.name));
                sink.push("Commands:\n");
                for def in defs {
                    sink.push(format!("`{}` - {}\n", def.name, def.description));
                }
            }
        }
        sink.flush(env).await
    }
}
