//! One interpreter session on one node.

use replink_core::{DEFAULT_CHANNEL, Endpoint, InterpreterProfile, SharedChannel};

/// Session error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is not open")]
    NotOpen,
    #[error("session is already open")]
    AlreadyOpen,
    #[error("session is already closed")]
    AlreadyClosed,
    #[error(transparent)]
    Channel(#[from] replink_core::ChannelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unopened,
    Open,
    Closed,
}

/// An interactive interpreter session on a node's channel.
///
/// The session borrows its endpoint, launches the interpreter over the
/// named channel on [`open`](Self::open), exchanges commands one at a time
/// with [`cmd`](Self::cmd), and ends the interpreter process on
/// [`close`](Self::close). Prefer [`with_python`](crate::with_python) for
/// the open/close pairing; it releases the session on every exit path.
///
/// A session assumes exclusive use of its channel for its whole lifetime.
/// Driving one channel from two sessions produces undefined interleaving
/// of commands and responses.
pub struct PythonSession<'a, E: Endpoint + ?Sized> {
    endpoint: &'a E,
    channel_name: String,
    profile: InterpreterProfile,
    state: State,
    channel: Option<SharedChannel>,
}

impl<'a, E: Endpoint + ?Sized> PythonSession<'a, E> {
    /// Create a session over the endpoint's default channel.
    #[must_use]
    pub fn new(endpoint: &'a E) -> Self {
        Self::with_channel(endpoint, DEFAULT_CHANNEL)
    }

    /// Create a session over a named channel.
    #[must_use]
    pub fn with_channel<S: Into<String>>(endpoint: &'a E, channel_name: S) -> Self {
        Self::with_profile(endpoint, channel_name, InterpreterProfile::default())
    }

    /// Create a session with an explicit interpreter profile.
    #[must_use]
    pub fn with_profile<S: Into<String>>(
        endpoint: &'a E,
        channel_name: S,
        profile: InterpreterProfile,
    ) -> Self {
        Self {
            endpoint,
            channel_name: channel_name.into(),
            profile,
            state: State::Unopened,
            channel: None,
        }
    }

    /// Whether the session is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Name of the transport channel this session drives.
    #[must_use]
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// The interpreter profile this session was built with.
    #[must_use]
    pub const fn profile(&self) -> &InterpreterProfile {
        &self.profile
    }

    /// Launch and prime the interpreter.
    ///
    /// Sends the launch directive, then each bootstrap directive, in order,
    /// awaiting the interpreter prompt after each one. Priming extends the
    /// interpreter's module search path with the profile's scratch
    /// directory; that remote-side mutation is part of the contract, not an
    /// accident.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyOpen`] / [`SessionError::AlreadyClosed`]
    /// when called out of the `Unopened` state, and propagates transport
    /// errors (unreachable endpoint, prompt never observed) unmodified. On
    /// failure the session stays unopened and no command may be sent.
    pub async fn open(&mut self) -> Result<(), SessionError> {
        match self.state {
            State::Unopened => {}
            State::Open => return Err(SessionError::AlreadyOpen),
            State::Closed => return Err(SessionError::AlreadyClosed),
        }

        let channel = self.endpoint.channel(&self.channel_name).await?;
        {
            let mut chan = channel.lock().await;
            chan.send_and_await(&self.profile.launch, &self.profile.prompt)
                .await?;
            for directive in self.profile.bootstrap_directives() {
                chan.send_and_await(&directive, &self.profile.prompt).await?;
            }
        }

        self.channel = Some(channel);
        self.state = State::Open;
        tracing::debug!(channel = %self.channel_name, "interpreter session opened");
        Ok(())
    }

    /// Execute one command and return its output.
    ///
    /// `command` must be a single instruction the interpreter accepts as a
    /// complete unit; multi-line staging is not supported here. The call
    /// returns once the prompt reappears, so sequential commands complete
    /// on the interpreter in the order they were issued.
    ///
    /// The returned string is the transport's capture verbatim, echoed
    /// command and trailing prompt included. Interpreter-side failures
    /// (e.g. a traceback followed by the prompt) are ordinary output, not
    /// errors of this call.
    ///
    /// # Errors
    /// Returns [`SessionError::NotOpen`] when the session is not open, and
    /// propagates transport errors unmodified. A transport failure leaves
    /// the session open; the caller decides whether to retry or close.
    pub async fn cmd(&mut self, command: &str) -> Result<String, SessionError> {
        if self.state != State::Open {
            return Err(SessionError::NotOpen);
        }
        let channel = self.channel.as_ref().ok_or(SessionError::NotOpen)?;

        let response = channel
            .lock()
            .await
            .send_and_await(command, &self.profile.prompt)
            .await?;
        tracing::debug!(channel = %self.channel_name, bytes = response.len(), "command exchange completed");
        Ok(response)
    }

    /// End the interpreter process.
    ///
    /// Sends the termination directive without waiting for a prompt; the
    /// interpreter exits, so none is expected. A delivery failure is logged
    /// and swallowed — close runs during scope exit and must not shadow an
    /// in-scope error. The session is closed afterwards either way.
    ///
    /// # Errors
    /// Returns [`SessionError::NotOpen`] / [`SessionError::AlreadyClosed`]
    /// when called out of the `Open` state.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        match self.state {
            State::Open => {}
            State::Unopened => return Err(SessionError::NotOpen),
            State::Closed => return Err(SessionError::AlreadyClosed),
        }
        let channel = self.channel.as_ref().ok_or(SessionError::NotOpen)?;

        if let Err(e) = channel.lock().await.send(&self.profile.terminate).await {
            tracing::warn!(channel = %self.channel_name, error = %e, "termination directive not delivered");
        }
        self.state = State::Closed;
        tracing::debug!(channel = %self.channel_name, "interpreter session closed");
        Ok(())
    }
}
