//! Core abstractions for driving interactive interpreters on remote nodes.
//!
//! This crate provides the fundamental building blocks:
//! - `Channel` / `Endpoint` - Transport capability traits
//! - `SharedChannel` - Shared handle to an open channel
//! - `InterpreterProfile` - Directive and prompt literals per interpreter flavor

pub mod profile;
pub mod traits;

pub use profile::{DEFAULT_CHANNEL, InterpreterProfile};
pub use traits::{Channel, ChannelError, Endpoint, SharedChannel};
