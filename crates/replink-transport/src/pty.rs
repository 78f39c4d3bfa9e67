//! PTY-backed local channel.

use std::{
    io::{Read, Write},
    time::Duration,
};

use async_trait::async_trait;
use portable_pty::{CommandBuilder, PtySize, native_pty_system};
use replink_core::{Channel, ChannelError};
use tokio::{
    sync::mpsc,
    time::{Instant, timeout_at},
};

use crate::command::ChannelCommand;

/// Default bound on waiting for a pattern to appear.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Channel over a local PTY running the channel program.
///
/// A blocking reader task drains PTY output into an in-process queue;
/// `send_and_await` scans the accumulated stream for the pattern under
/// this channel's timeout. Because the program runs on a PTY, captures
/// include the echoed input line; the session layer passes captures
/// through verbatim.
///
/// Timeout policy lives here, not in the session: a caller that needs a
/// different bound configures the channel, and sessions simply observe
/// success or failure.
pub struct PtyChannel {
    writer: Box<dyn Write + Send>,
    output: mpsc::UnboundedReceiver<Vec<u8>>,
    pending: String,
    prompt_timeout: Duration,
    // Held so the PTY and the spawned program outlive the channel.
    _master: Box<dyn portable_pty::MasterPty + Send>,
    _child: Box<dyn portable_pty::Child + Send + Sync>,
}

impl std::fmt::Debug for PtyChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyChannel")
            .field("prompt_timeout", &self.prompt_timeout)
            .finish_non_exhaustive()
    }
}

impl PtyChannel {
    /// Spawn `command` on a fresh PTY.
    ///
    /// # Errors
    /// Returns [`ChannelError::Unreachable`] when the program cannot be
    /// resolved or the PTY cannot be set up.
    pub async fn spawn(command: &ChannelCommand) -> Result<Self, ChannelError> {
        let (program, args) = command
            .build_resolved()
            .await
            .map_err(|e| ChannelError::Unreachable(e.to_string()))?;

        let portable_pty::PtyPair { master, slave } = native_pty_system()
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ChannelError::Unreachable(e.to_string()))?;

        let mut cmd = CommandBuilder::new(&program);
        cmd.args(&args);
        cmd.env("TERM", "dumb");

        let child = slave
            .spawn_command(cmd)
            .map_err(|e| ChannelError::Unreachable(e.to_string()))?;
        drop(slave);

        let mut reader = master
            .try_clone_reader()
            .map_err(|e| ChannelError::Unreachable(e.to_string()))?;
        let writer = master
            .take_writer()
            .map_err(|e| ChannelError::Unreachable(e.to_string()))?;

        let (tx, output) = mpsc::unbounded_channel();
        tokio::task::spawn_blocking(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "pty reader stopped");
                        break;
                    }
                }
            }
        });

        tracing::debug!(program = %program.display(), "channel program spawned on pty");

        Ok(Self {
            writer,
            output,
            pending: String::new(),
            prompt_timeout: DEFAULT_PROMPT_TIMEOUT,
            _master: master,
            _child: child,
        })
    }

    /// Override the prompt-wait bound.
    #[must_use]
    pub const fn with_prompt_timeout(mut self, timeout: Duration) -> Self {
        self.prompt_timeout = timeout;
        self
    }

    async fn await_pattern(&mut self, pattern: &str) -> Result<String, ChannelError> {
        let deadline = Instant::now() + self.prompt_timeout;
        loop {
            // Residual output from the previous exchange is scanned first.
            if let Some(end) = self.pending.find(pattern).map(|i| i + pattern.len()) {
                let rest = self.pending.split_off(end);
                let captured = std::mem::replace(&mut self.pending, rest);
                return Ok(captured);
            }

            let chunk = match timeout_at(deadline, self.output.recv()).await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => return Err(ChannelError::Closed),
                Err(_) => {
                    return Err(ChannelError::PromptTimeout {
                        pattern: pattern.to_string(),
                    });
                }
            };
            self.pending.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}

#[async_trait]
impl Channel for PtyChannel {
    async fn send(&mut self, line: &str) -> Result<(), ChannelError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    async fn send_and_await(
        &mut self,
        line: &str,
        pattern: &str,
    ) -> Result<String, ChannelError> {
        self.send(line).await?;
        self.await_pattern(pattern).await
    }
}
