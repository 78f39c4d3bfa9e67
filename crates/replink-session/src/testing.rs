//! Scripted transport doubles for session tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex as StdMutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use replink_core::{Channel, ChannelError, Endpoint, SharedChannel};
use tokio::sync::Mutex;

pub(crate) type SentLog = Arc<StdMutex<Vec<String>>>;

/// Channel that replays canned replies for each pattern-awaiting send and
/// records every line that went out.
struct ScriptedChannel {
    sent: SentLog,
    replies: VecDeque<Result<String, ChannelError>>,
    fail_plain: Arc<AtomicBool>,
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn send(&mut self, line: &str) -> Result<(), ChannelError> {
        if self.fail_plain.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        self.sent.lock().unwrap().push(line.to_string());
        Ok(())
    }

    async fn send_and_await(
        &mut self,
        line: &str,
        pattern: &str,
    ) -> Result<String, ChannelError> {
        self.sent.lock().unwrap().push(line.to_string());
        self.replies.pop_front().unwrap_or_else(|| {
            Err(ChannelError::PromptTimeout {
                pattern: pattern.to_string(),
            })
        })
    }
}

/// Endpoint serving one scripted channel under every name.
pub(crate) struct ScriptedEndpoint {
    channel: SharedChannel,
    fail_plain: Arc<AtomicBool>,
}

impl ScriptedEndpoint {
    pub(crate) fn new(replies: Vec<Result<String, ChannelError>>) -> (Self, SentLog) {
        let sent = SentLog::default();
        let fail_plain = Arc::new(AtomicBool::new(false));
        let channel = ScriptedChannel {
            sent: Arc::clone(&sent),
            replies: replies.into(),
            fail_plain: Arc::clone(&fail_plain),
        };
        (
            Self {
                channel: Arc::new(Mutex::new(channel)),
                fail_plain,
            },
            sent,
        )
    }

    /// Make fire-and-forget sends fail from now on.
    pub(crate) fn fail_plain_sends(&self) {
        self.fail_plain.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Endpoint for ScriptedEndpoint {
    async fn channel(&self, _name: &str) -> Result<SharedChannel, ChannelError> {
        Ok(Arc::clone(&self.channel))
    }
}

/// Endpoint whose channels can never be established.
pub(crate) struct UnreachableEndpoint;

#[async_trait]
impl Endpoint for UnreachableEndpoint {
    async fn channel(&self, name: &str) -> Result<SharedChannel, ChannelError> {
        Err(ChannelError::Unreachable(format!(
            "no route to node for channel '{name}'"
        )))
    }
}

/// A reply ending in the default Python prompt.
pub(crate) fn prompt_reply(body: &str) -> Result<String, ChannelError> {
    if body.is_empty() {
        Ok(">>> ".to_string())
    } else {
        Ok(format!("{body}\n>>> "))
    }
}

/// A reply simulating a transport that never saw the prompt.
pub(crate) fn timeout_reply() -> Result<String, ChannelError> {
    Err(ChannelError::PromptTimeout {
        pattern: ">>> ".to_string(),
    })
}
