//! Scoped interpreter sessions over endpoint channels.
//!
//! Provides:
//! - `PythonSession` - One open interpreter session on a node
//! - `with_python` / `with_python_on` - Scoped open/run/close helpers

pub mod python;
pub mod scope;

#[cfg(test)]
pub(crate) mod testing;

pub use python::{PythonSession, SessionError};
pub use scope::{with_python, with_python_on};
