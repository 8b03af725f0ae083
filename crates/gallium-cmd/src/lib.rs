//! # gallium-cmd
//!
//! The command layer of the gallium chat bot: everything between a raw line
//! of text typed at the bot and a validated, strongly-typed command
//! invocation.
//!
//! ## Pieces
//!
//! - [`scanner`]: sticky regex tokenizer (cursor-anchored, never searches
//!   ahead)
//! - [`argv`]: quote-aware split of a command line into an argument vector
//! - [`command`]: declarative command/parameter metadata with an explicit
//!   builder
//! - [`convert`]: per-parameter validation/conversion functions
//! - [`registry`]: name-keyed command store and the binding algorithm
//! - [`env`]: the capability trait command bodies run against, plus the
//!   bounded [`LongReply`] sink
//! - [`help`]: usage-line and parameter-list rendering
//! - [`dispatcher`]: the first-generation whole-message parser, kept for its
//!   exact argument-handling behavior
//!
//! ## Quick start
//!
//! ```no_run
//! use gallium_cmd::{CommandDef, Param, Permission};
//! use gallium_cmd::{Args, Command, CommandResult, Environment};
//! use gallium_cmd::convert;
//! use async_trait::async_trait;
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Command for Greet {
//!     fn def(&self) -> CommandDef {
//!         CommandDef::new("greet")
//!             .describe("Greets somebody")
//!             .permission(Permission::Anyone)
//!             .param(Param::positional(0, "who", convert::name))
//!     }
//!
//!     async fn run(&self, args: Args, env: &mut dyn Environment) -> CommandResult {
//!         let who = args.str("who").unwrap_or("world");
//!         env.reply(&format!("Hello, {who}!")).await
//!     }
//! }
//! ```
//!
//! Parsing is synchronous and does no I/O; only the command body is async.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod args;
pub mod argv;
pub mod command;
pub mod convert;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod help;
pub mod registry;
pub mod scanner;

pub use self::args::{AmbientArgs, ArgValue, Args};
pub use self::command::{
    AccessCheck, AccessPredicate, CommandDef, Converter, Param, ParamPosition, Permission,
};
pub use self::env::{CommandResult, Environment, LongReply, DEFAULT_MESSAGE_CAP};
pub use self::error::{CommandError, InvokeError, RegistryError};
pub use self::registry::{Command, Registry};
pub use self::scanner::{Scanner, Token};
