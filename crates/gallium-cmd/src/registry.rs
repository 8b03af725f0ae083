//! Command registry and the argument binding algorithm.
//!
//! The registry is a case-insensitive name-keyed store of command
//! definitions paired with their handlers. [`Registry::invoke`] is the heart
//! of the command layer: it resolves the name, checks permission, walks the
//! argument vector binding positional/named/switch parameters through their
//! converters, injects ambient handles, and awaits the command body exactly
//! once.
//!
//! Registration happens at startup, before any traffic; steady-state
//! invocations only read the map, so no locking is needed (the owner wraps
//! the registry in an `Arc` and shares it).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::args::{AmbientArgs, ArgValue, Args};
use crate::command::{AccessCheck, CommandDef, Param, ParamPosition};
use crate::env::{CommandResult, Environment};
use crate::error::{InvokeError, RegistryError};

/// A registered command: metadata plus an async body.
#[async_trait]
pub trait Command: Send + Sync {
    /// Build this command's metadata. Called once, at registration.
    fn def(&self) -> CommandDef;

    /// Execute with fully bound arguments.
    async fn run(&self, args: Args, env: &mut dyn Environment) -> CommandResult;
}

struct Entry {
    def: Arc<CommandDef>,
    handler: Box<dyn Command>,
}

/// Name-keyed store of command definitions.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Entry>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register one command. The definition is validated here; a structural
    /// defect is a startup error, not something to discover at invoke time.
    pub fn register(&mut self, handler: Box<dyn Command>) -> Result<(), RegistryError> {
        let def = handler.def();
        def.validate()?;
        let key = def.name.to_ascii_lowercase();
        if self.commands.contains_key(&key) {
            return Err(RegistryError::DuplicateCommand(def.name));
        }
        debug!(command = %def.name, params = def.params.len(), "registered command");
        self.commands.insert(
            key,
            Entry {
                def: Arc::new(def),
                handler,
            },
        );
        Ok(())
    }

    /// Register a collection of commands discovered elsewhere.
    pub fn register_all<I>(&mut self, handlers: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Box<dyn Command>>,
    {
        for handler in handlers {
            self.register(handler)?;
        }
        Ok(())
    }

    /// Remove a command by name (tests only in practice).
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        self.commands
            .remove(&name.to_ascii_lowercase())
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotRegistered(name.to_owned()))
    }

    /// Look up a definition by (case-insensitive) name.
    pub fn get(&self, name: &str) -> Option<Arc<CommandDef>> {
        self.commands
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.def.clone())
    }

    /// All registered definitions, in no particular order.
    pub fn defs(&self) -> impl Iterator<Item = &Arc<CommandDef>> {
        self.commands.values().map(|entry| &entry.def)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolve `name`, check permission, bind `argv`, inject `ambient`, and
    /// run the command body against `env`.
    ///
    /// Binding rules, in argv order with `allow_named` initially true:
    /// - a literal `--` while named arguments are allowed consumes the token
    ///   and disables them for the rest of the line;
    /// - `--name` resolves case-insensitively against named/switch
    ///   parameters; a switch binds true immediately, a named parameter
    ///   consumes the next token as its raw value;
    /// - any other token goes to the lowest-index positional parameter not
    ///   yet consumed; surplus positional tokens are skipped, not an error;
    /// - after the walk, a required parameter that was never bound fails,
    ///   checked in declaration order.
    ///
    /// Permission is checked before any converter runs.
    pub async fn invoke(
        &self,
        name: &str,
        argv: &[String],
        ambient: &AmbientArgs,
        env: &mut dyn Environment,
    ) -> Result<(), InvokeError> {
        let Some(entry) = self.commands.get(&name.to_ascii_lowercase()) else {
            return Err(InvokeError::NoCommand);
        };
        let def = &entry.def;

        let allowed = match &def.access {
            AccessCheck::Level(level) => env.check_permission(*level).await,
            AccessCheck::Predicate(check) => check(&def.name, argv),
        };
        if !allowed {
            return Err(InvokeError::NoPermission);
        }

        let args = bind_args(def, argv, ambient)?;

        debug!(command = %def.name, argc = argv.len(), "invoking command");
        entry.handler.run(args, env).await?;
        Ok(())
    }
}

/// Walk `argv` against the definition and produce the bound argument set.
fn bind_args(def: &CommandDef, argv: &[String], ambient: &AmbientArgs) -> Result<Args, InvokeError> {
    // Positional parameters are consumed lowest index first, regardless of
    // where the interspersed options sit in argv.
    let mut pending: Vec<&Param> = def.params.iter().filter(|p| p.index().is_some()).collect();
    pending.sort_by_key(|p| p.index());

    // Name table covers named/switch parameters and also positional ones, so
    // that `--name` against a positional parameter is a diagnosable error
    // rather than an unknown option.
    let mut by_name: HashMap<String, &Param> = HashMap::new();
    for param in &def.params {
        if !matches!(param.position, ParamPosition::Ambient) {
            by_name.insert(param.name.to_ascii_lowercase(), param);
        }
    }

    let mut args = Args::new();
    let mut bound: HashSet<String> = HashSet::new();
    let mut allow_named = true;
    let mut i = 0;

    while i < argv.len() {
        let token = argv[i].as_str();

        if allow_named && token == "--" {
            allow_named = false;
            i += 1;
            continue;
        }

        if allow_named && token.starts_with("--") {
            let attempted = &token[2..];
            let Some(param) = by_name.get(&attempted.to_ascii_lowercase()).copied() else {
                return Err(InvokeError::NoParam {
                    name: attempted.to_owned(),
                    message: "Nonexistent parameter".to_owned(),
                });
            };
            match param.position {
                ParamPosition::Index(_) => {
                    return Err(InvokeError::BadParam {
                        name: param.name.clone(),
                        message: "This argument is positional; pass it without the option flag"
                            .to_owned(),
                    });
                }
                ParamPosition::Switch => {
                    args.bind(&param.name, ArgValue::Bool(true), param.repeating);
                    bound.insert(param.name.to_ascii_lowercase());
                }
                ParamPosition::Named => {
                    i += 1;
                    let Some(raw) = argv.get(i) else {
                        return Err(InvokeError::BadParam {
                            name: param.name.clone(),
                            message: "Named argument requires a value".to_owned(),
                        });
                    };
                    let value = (param.converter)(raw).map_err(|message| InvokeError::BadParam {
                        name: param.name.clone(),
                        message,
                    })?;
                    args.bind(&param.name, value, param.repeating);
                    bound.insert(param.name.to_ascii_lowercase());
                }
                ParamPosition::Ambient => {
                    unreachable!("ambient parameters are not in the name table")
                }
            }
        } else if pending.is_empty() {
            // Surplus positional token; skipped, not an error.
            debug!(command = %def.name, token, "ignoring surplus positional argument");
        } else {
            let param = pending.remove(0);
            let value = (param.converter)(token).map_err(|message| InvokeError::BadParam {
                name: param.name.clone(),
                message,
            })?;
            args.bind(&param.name, value, param.repeating);
            bound.insert(param.name.to_ascii_lowercase());
        }

        i += 1;
    }

    for param in &def.params {
        if matches!(param.position, ParamPosition::Ambient) {
            continue;
        }
        if param.optional || bound.contains(&param.name.to_ascii_lowercase()) {
            continue;
        }
        let kind = if param.index().is_some() {
            "positional"
        } else {
            "named"
        };
        return Err(InvokeError::NoParam {
            name: param.name.clone(),
            message: format!("Missing a required {kind} argument"),
        });
    }

    for param in &def.params {
        if !matches!(param.position, ParamPosition::Ambient) {
            continue;
        }
        let Some(value) = ambient.get(&param.name) else {
            return Err(InvokeError::Internal(format!(
                "ambient argument `{}` not present",
                param.name
            )));
        };
        args.bind(&param.name, ArgValue::Shared(value.clone()), false);
    }

    Ok(args)
}
