//! Deliberate failure, for exercising the error boundary.

use async_trait::async_trait;
use gallium_cmd::{
    Args, Command, CommandDef, CommandError, CommandResult, Environment, Permission,
};

/// Fails on purpose so operators can verify that command failures are
/// logged and answered generically.
pub struct RaiseError;

#[async_trait]
impl Command for RaiseError {
    fn def(&self) -> CommandDef {
        CommandDef::new("raiseerror")
            .describe("Fail on purpose")
            .permission(Permission::ListedAdmin)
    }

    async fn run(&self, _args: Args, _env: &mut dyn Environment) -> CommandResult {
        Err(CommandError::Failed("error command invoked".to_owned()))
    }
}
