//! Channel program command lines.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Command build error.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command line cannot be parsed: {0}")]
    Invalid(String),
    #[error("command line is empty after parsing")]
    Empty,
    #[error("program not found: {0}")]
    NotFound(String),
}

/// Parsed command parts (program + args).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParts {
    pub program: String,
    pub args: Vec<String>,
}

/// Describes how to start a channel program on the local machine.
///
/// The base is a full command line split with shlex rules; params are
/// appended verbatim. A wrapper like `ip netns exec h1 bash` is a single
/// base.
#[derive(Debug, Clone)]
pub struct ChannelCommand {
    base: String,
    params: Vec<String>,
}

impl ChannelCommand {
    /// Create a command from a base command line.
    #[must_use]
    pub fn new<S: Into<String>>(base: S) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    /// Append parameters.
    #[must_use]
    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Split into program + args.
    ///
    /// # Errors
    /// Returns error if the base command line is malformed or empty.
    pub fn build(&self) -> Result<CommandParts, CommandError> {
        let mut parts =
            shlex::split(&self.base).ok_or_else(|| CommandError::Invalid(self.base.clone()))?;
        parts.extend(self.params.iter().cloned());

        if parts.is_empty() {
            return Err(CommandError::Empty);
        }

        let program = parts.remove(0);
        Ok(CommandParts {
            program,
            args: parts,
        })
    }

    /// Split and resolve the program to an absolute path.
    ///
    /// # Errors
    /// Returns error if the command line is invalid or the program cannot
    /// be found.
    pub async fn build_resolved(&self) -> Result<(PathBuf, Vec<String>), CommandError> {
        let CommandParts { program, args } = self.build()?;
        let resolved = resolve_program(&program)
            .await
            .ok_or(CommandError::NotFound(program))?;
        Ok((resolved, args))
    }
}

/// Resolve a program name against PATH without blocking the runtime.
pub async fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.trim().is_empty() {
        return None;
    }

    let path = Path::new(program);
    if path.is_absolute() && path.is_file() {
        return Some(path.to_path_buf());
    }

    let program = program.to_string();
    tokio::task::spawn_blocking(move || which::which(program))
        .await
        .ok()
        .and_then(Result::ok)
}
