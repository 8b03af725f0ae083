//! Error types for the command layer.
//!
//! Two families live here: the user-facing invocation taxonomy
//! ([`InvokeError`]) produced by registry binding, and the internal classes
//! ([`CommandError`], [`RegistryError`]) for command-body failures and
//! registration-time configuration defects. The whole-message parser has its
//! own failure type in [`crate::dispatcher`] because it carries a partial
//! parse result.

use thiserror::Error;

/// Errors raised by a running command body.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command decided to fail with a plain message.
    #[error("{0}")]
    Failed(String),

    /// The reply channel could not deliver output.
    #[error("output error: {0}")]
    Output(String),

    /// Anything else the body bubbled up.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Outcome classes of [`crate::registry::Registry::invoke`].
///
/// The first four variants are the user-facing taxonomy and are rendered to
/// the person who typed the command. `Internal` and `Command` belong to the
/// per-invocation error boundary: they are logged with attribution and
/// answered generically, never formatted through the user taxonomy.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The command name is not registered.
    #[error("No command by this name.")]
    NoCommand,

    /// A required parameter was never supplied, or `--name` referenced a
    /// parameter that does not exist.
    #[error("parameter `{name}`: {message}")]
    NoParam {
        /// The parameter (or attempted option name) at fault.
        name: String,
        /// User-facing explanation.
        message: String,
    },

    /// A supplied value failed conversion, a named parameter was missing its
    /// value, or a positional parameter was passed by name.
    #[error("parameter `{name}`: {message}")]
    BadParam {
        /// The parameter at fault.
        name: String,
        /// User-facing explanation (usually the converter's message).
        message: String,
    },

    /// The environment denied the command's permission requirement.
    #[error("You don't have permission to do this.")]
    NoPermission,

    /// A wiring defect (e.g. an ambient parameter absent from the injected
    /// context). Operator-facing, never user-facing.
    #[error("internal error: {0}")]
    Internal(String),

    /// The command body itself failed after a successful bind.
    #[error("command failed: {0}")]
    Command(#[from] CommandError),
}

impl InvokeError {
    /// Short tag used when rendering failures back to the user.
    pub fn kind(&self) -> &'static str {
        match self {
            InvokeError::NoCommand => "nocommand",
            InvokeError::NoParam { .. } => "noparam",
            InvokeError::BadParam { .. } => "badparam",
            InvokeError::NoPermission => "nopermission",
            InvokeError::Internal(_) => "internal",
            InvokeError::Command(_) => "command",
        }
    }

    /// Name of the offending parameter, when there is one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            InvokeError::NoParam { name, .. } | InvokeError::BadParam { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this variant may be shown to the person who typed the
    /// command. The boundary variants are logged instead.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, InvokeError::Internal(_) | InvokeError::Command(_))
    }

    /// The text shown to the user for the user-facing variants.
    pub fn user_message(&self) -> String {
        match self {
            InvokeError::NoParam { message, .. } | InvokeError::BadParam { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Registration-time configuration defects. These abort startup; they are
/// never produced by user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two commands share a (case-insensitive) name.
    #[error("command `{0}` is already registered")]
    DuplicateCommand(String),

    /// Two parameters of one command share a (case-insensitive) name.
    #[error("duplicate parameter name `{1}` on command `{0}`")]
    DuplicateParam(String, String),

    /// Two parameters of one command claim the same positional index.
    #[error("duplicate positional index {1} on command `{0}`")]
    DuplicateIndex(String, u32),

    /// Positional indices must form a contiguous run starting at 0.
    #[error("positional indices on command `{0}` must be contiguous from 0")]
    IndexGap(String),

    /// Unregistering a name that was never registered.
    #[error("command `{0}` is not registered")]
    NotRegistered(String),
}
