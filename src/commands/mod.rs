//! Built-in commands.

mod help;
mod ping;
mod raise_error;

use gallium_cmd::Command;

/// Every built-in command, ready for registration.
pub fn all() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(ping::Ping),
        Box::new(help::Help),
        Box::new(raise_error::RaiseError),
    ]
}
