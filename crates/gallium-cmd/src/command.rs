//! Declarative command metadata.
//!
//! A [`CommandDef`] describes one command: name, description, permission
//! requirement, and an ordered parameter list. Definitions are built with an
//! explicit builder - one chained call per parameter, appended in declared
//! order - and validated once at registration. They are never mutated after
//! that; the registry shares them read-only across invocations.

use std::fmt;
use std::sync::Arc;

use crate::args::ArgValue;
use crate::error::RegistryError;

/// Pure validation/conversion function for one parameter.
pub type Converter = fn(&str) -> Result<ArgValue, String>;

/// Predicate form of a permission requirement, evaluated over the command
/// name and raw argument vector.
pub type AccessPredicate = Arc<dyn Fn(&str, &[String]) -> bool + Send + Sync>;

/// Fixed permission levels, evaluated by the environment against the
/// invoking user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Never allowed (the default for a definition that forgot to say).
    Nobody,
    /// Absolutely anyone.
    Anyone,
    /// Users on the configured admin list, and the owner.
    ListedAdmin,
    /// The configured owner only.
    Owner,
}

/// A command's permission requirement: a fixed level, or an arbitrary
/// predicate over the parsed invocation.
#[derive(Clone)]
pub enum AccessCheck {
    /// Level checked by [`crate::env::Environment::check_permission`].
    Level(Permission),
    /// Caller-supplied predicate; receives the command name and argv.
    Predicate(AccessPredicate),
}

impl fmt::Debug for AccessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessCheck::Level(level) => f.debug_tuple("Level").field(level).finish(),
            AccessCheck::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// How a parameter is bound from the argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPosition {
    /// Consumed from the unclaimed positional tokens, lowest index first.
    Index(u32),
    /// `--name value`.
    Named,
    /// `--name` alone; binds boolean true.
    Switch,
    /// Never user-supplied; injected from [`crate::args::AmbientArgs`].
    Ambient,
}

/// One parameter of a command.
#[derive(Debug, Clone)]
pub struct Param {
    /// Identifier, unique within the command, matched case-insensitively.
    pub name: String,
    /// Human text for help rendering only.
    pub description: String,
    /// Binding kind.
    pub position: ParamPosition,
    /// If false and never bound, invocation fails with a missing-parameter
    /// error.
    pub optional: bool,
    /// Bindings append to a sequence instead of overwriting.
    pub repeating: bool,
    /// Validation/conversion function run on the raw token.
    pub converter: Converter,
}

impl Param {
    fn new(name: &str, position: ParamPosition, optional: bool, converter: Converter) -> Self {
        Param {
            name: name.to_owned(),
            description: String::new(),
            position,
            optional,
            repeating: false,
            converter,
        }
    }

    /// Positional parameter at `index`. Required by default.
    pub fn positional(index: u32, name: &str, converter: Converter) -> Self {
        Param::new(name, ParamPosition::Index(index), false, converter)
    }

    /// Named `--name value` parameter. Optional by default.
    pub fn named(name: &str, converter: Converter) -> Self {
        Param::new(name, ParamPosition::Named, true, converter)
    }

    /// Boolean `--name` switch. Optional by default.
    pub fn switch(name: &str) -> Self {
        Param::new(name, ParamPosition::Switch, true, crate::convert::string)
    }

    /// Ambient parameter injected by the dispatch caller. Always required.
    pub fn ambient(name: &str) -> Self {
        Param::new(name, ParamPosition::Ambient, false, crate::convert::string)
    }

    /// Set the help text.
    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_owned();
        self
    }

    /// Mark the parameter as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the parameter as required.
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Mark the parameter as repeating.
    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    /// The positional index, for `Index` parameters.
    pub fn index(&self) -> Option<u32> {
        match self.position {
            ParamPosition::Index(i) => Some(i),
            _ => None,
        }
    }

    /// True for named and switch parameters (the `--name` family).
    pub fn takes_option_syntax(&self) -> bool {
        matches!(self.position, ParamPosition::Named | ParamPosition::Switch)
    }
}

/// Complete metadata for one command.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Registry key, unique case-insensitively.
    pub name: String,
    /// Human description for help rendering.
    pub description: String,
    /// Permission requirement checked before any binding happens.
    pub access: AccessCheck,
    /// Parameters in declared order.
    pub params: Vec<Param>,
}

impl CommandDef {
    /// Start a definition. Permission defaults to [`Permission::Nobody`]
    /// so a command that forgets to declare one is inert rather than open.
    pub fn new(name: &str) -> Self {
        CommandDef {
            name: name.to_owned(),
            description: String::new(),
            access: AccessCheck::Level(Permission::Nobody),
            params: Vec::new(),
        }
    }

    /// Set the description.
    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_owned();
        self
    }

    /// Require a fixed permission level.
    pub fn permission(mut self, level: Permission) -> Self {
        self.access = AccessCheck::Level(level);
        self
    }

    /// Require a caller-supplied predicate instead of a level.
    pub fn permission_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&str, &[String]) -> bool + Send + Sync + 'static,
    {
        self.access = AccessCheck::Predicate(Arc::new(check));
        self
    }

    /// Append one parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Check the structural invariants: unique case-insensitive parameter
    /// names, and positional indices that are unique and contiguous from 0.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen_names: Vec<String> = Vec::new();
        for param in &self.params {
            let lower = param.name.to_ascii_lowercase();
            if seen_names.contains(&lower) {
                return Err(RegistryError::DuplicateParam(
                    self.name.clone(),
                    param.name.clone(),
                ));
            }
            seen_names.push(lower);
        }

        let mut indices: Vec<u32> = self.params.iter().filter_map(Param::index).collect();
        indices.sort_unstable();
        for (expected, index) in indices.iter().enumerate() {
            if *index == expected as u32 {
                continue;
            }
            if indices[..expected].contains(index) {
                return Err(RegistryError::DuplicateIndex(self.name.clone(), *index));
            }
            return Err(RegistryError::IndexGap(self.name.clone()));
        }
        Ok(())
    }
}
