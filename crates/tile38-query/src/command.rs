//! The terminal value handed to the transport: a command name plus its
//! ordered argument tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A compiled protocol command.
///
/// `name` is the first token on the wire (`NEARBY`, `SET`, ...); `args` are the
/// remaining tokens in exactly the order the server expects. Joining
/// `name` and `args` with single spaces reproduces the literal command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// All tokens, command name first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Consume the command into a flat token list, command name first.
    pub fn into_tokens(self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(self.name);
        tokens.extend(self.args);
        tokens
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Accumulates argument tokens in emission order while a compiler walks its
/// clause slots.
#[derive(Debug, Default)]
pub(crate) struct ArgWriter {
    args: Vec<String>,
}

impl ArgWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.args.push(token.into());
        self
    }

    pub(crate) fn extend<I>(&mut self, tokens: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub(crate) fn finish(self, name: &str) -> Command {
        let command = Command::new(name, self.args);
        tracing::trace!(name = %command.name, args = command.args.len(), "compiled command");
        command
    }
}
