//! Local endpoint backed by PTY channels.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use replink_core::{ChannelError, DEFAULT_CHANNEL, Endpoint, SharedChannel};
use tokio::sync::{Mutex, RwLock};

use crate::{command::ChannelCommand, pty::PtyChannel};

/// Endpoint whose channels are programs on the local machine.
///
/// Fits nodes that are reachable through a local command: a plain local
/// shell, or a virtualized node entered via a wrapper such as
/// `ip netns exec h1 bash` registered under a channel name. Channels open
/// lazily on first request; repeated requests for the same name return the
/// same shared handle.
pub struct LocalEndpoint {
    registry: HashMap<String, ChannelCommand>,
    open: RwLock<HashMap<String, SharedChannel>>,
}

impl LocalEndpoint {
    /// Endpoint with the default `bash` channel registered.
    #[must_use]
    pub fn new() -> Self {
        let mut endpoint = Self {
            registry: HashMap::new(),
            open: RwLock::new(HashMap::new()),
        };
        endpoint.register(DEFAULT_CHANNEL, ChannelCommand::new("bash"));
        endpoint
    }

    /// Register (or replace) a named channel.
    pub fn register<S: Into<String>>(&mut self, name: S, command: ChannelCommand) {
        self.registry.insert(name.into(), command);
    }
}

impl Default for LocalEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Endpoint for LocalEndpoint {
    async fn channel(&self, name: &str) -> Result<SharedChannel, ChannelError> {
        if let Some(open) = self.open.read().await.get(name) {
            return Ok(Arc::clone(open));
        }

        let command = self
            .registry
            .get(name)
            .ok_or_else(|| ChannelError::UnknownChannel(name.to_string()))?;

        let mut open = self.open.write().await;
        // A concurrent request may have opened the channel while we waited
        // for the write lock.
        if let Some(existing) = open.get(name) {
            return Ok(Arc::clone(existing));
        }

        let channel = PtyChannel::spawn(command).await?;
        tracing::debug!(channel = name, "local channel opened");

        let shared: SharedChannel = Arc::new(Mutex::new(channel));
        open.insert(name.to_string(), Arc::clone(&shared));
        Ok(shared)
    }
}
