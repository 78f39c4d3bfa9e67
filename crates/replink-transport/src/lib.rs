//! Transport collaborators for replink sessions.
//!
//! Provides:
//! - `ChannelCommand` - Channel program command lines
//! - `PtyChannel` - Channel over a local PTY
//! - `LocalEndpoint` - Endpoint handing out named local channels

pub mod command;
pub mod local;
pub mod pty;

pub use command::{ChannelCommand, CommandError, CommandParts};
pub use local::LocalEndpoint;
pub use pty::{DEFAULT_PROMPT_TIMEOUT, PtyChannel};
