//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Default transport channel name on a node.
pub const DEFAULT_CHANNEL: &str = "bash";

/// Directive and prompt literals for one interpreter flavor.
///
/// The defaults drive CPython's interactive interpreter. Override the
/// fields to drive a different flavor with its own prompt and directives;
/// session logic never hard-codes any of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterProfile {
    /// Directive that launches the interpreter on the channel.
    pub launch: String,
    /// Literal the interpreter emits when ready for the next directive.
    pub prompt: String,
    /// Shared scratch directory appended to the interpreter's module
    /// search path during bootstrap.
    pub scratch_dir: String,
    /// Directive that ends the interpreter process.
    pub terminate: String,
}

impl InterpreterProfile {
    /// Profile for the interactive Python interpreter.
    #[must_use]
    pub fn python() -> Self {
        Self {
            launch: "python".into(),
            prompt: ">>> ".into(),
            scratch_dir: "/tmp".into(),
            terminate: "exit()".into(),
        }
    }

    /// Override the prompt literal.
    #[must_use]
    pub fn with_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Override the scratch directory.
    #[must_use]
    pub fn with_scratch_dir<S: Into<String>>(mut self, dir: S) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Priming directives sent once after launch, in order.
    #[must_use]
    pub fn bootstrap_directives(&self) -> Vec<String> {
        vec![
            "import sys".to_string(),
            format!("sys.path.append(\"{}\")", self.scratch_dir),
        ]
    }
}

impl Default for InterpreterProfile {
    fn default() -> Self {
        Self::python()
    }
}
