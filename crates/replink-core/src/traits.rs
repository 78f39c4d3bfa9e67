//! Capability traits for reaching a node over a named channel.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

/// Shared handle to an open channel on an endpoint.
///
/// An endpoint hands out the same handle for repeated requests of the same
/// channel name. The mutex serializes exchanges: one command/response
/// round-trip completes before the next begins.
pub type SharedChannel = Arc<Mutex<dyn Channel>>;

/// Transport error.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("no channel named '{0}' on this endpoint")]
    UnknownChannel(String),
    #[error("pattern {pattern:?} not observed in output before the transport timeout")]
    PromptTimeout { pattern: String },
    #[error("channel closed by the remote side")]
    Closed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl std::fmt::Debug for dyn Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Channel")
    }
}

/// A named communication path to a node.
///
/// Implementations move the bytes however they like (PTY, socket, test
/// double); callers rely only on the two operations below.
#[async_trait]
pub trait Channel: Send {
    /// Send one line without waiting for any response.
    async fn send(&mut self, line: &str) -> Result<(), ChannelError>;

    /// Send one line, then wait until `pattern` appears in the output
    /// stream. Returns everything captured up to and including the match,
    /// exactly as received.
    async fn send_and_await(
        &mut self,
        line: &str,
        pattern: &str,
    ) -> Result<String, ChannelError>;
}

/// A remote or virtualized node exposing named channels.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Resolve the channel registered under `name`, opening it if needed.
    async fn channel(&self, name: &str) -> Result<SharedChannel, ChannelError>;
}
