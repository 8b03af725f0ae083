//! Console transport: one [`Environment`] per processed line.

use async_trait::async_trait;
use gallium_cmd::{CommandResult, Environment, Permission};

use crate::config::Config;

/// Environment backed by standard output.
///
/// Permission levels resolve against the configured owner and admin lists;
/// the console has no real user directory, so the invoking id is whatever
/// the frontend attributed the line to.
pub struct ConsoleEnvironment {
    invoker: String,
    owner_id: String,
    admins: Vec<String>,
    message_cap: usize,
    direct: bool,
}

impl ConsoleEnvironment {
    /// Build an environment for one message from `invoker`.
    pub fn new(config: &Config, invoker: &str, direct: bool) -> Self {
        ConsoleEnvironment {
            invoker: invoker.to_owned(),
            owner_id: config.bot.owner_id.clone(),
            admins: config.bot.admins.clone(),
            message_cap: config.limits.message_cap,
            direct,
        }
    }
}

#[async_trait]
impl Environment for ConsoleEnvironment {
    async fn output(&mut self, text: &str) -> CommandResult {
        println!("{text}");
        Ok(())
    }

    async fn check_permission(&self, level: Permission) -> bool {
        match level {
            Permission::Nobody => false,
            Permission::Anyone => true,
            Permission::ListedAdmin => {
                self.invoker == self.owner_id || self.admins.contains(&self.invoker)
            }
            Permission::Owner => self.invoker == self.owner_id,
        }
    }

    fn reply_prefix(&self) -> String {
        if self.direct {
            String::new()
        } else {
            format!("<@{}>, ", self.invoker)
        }
    }

    fn message_cap(&self) -> usize {
        self.message_cap
    }
}
