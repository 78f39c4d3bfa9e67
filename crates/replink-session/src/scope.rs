//! Scoped acquisition: open, run, always close.

use futures::future::BoxFuture;
use replink_core::{DEFAULT_CHANNEL, Endpoint, InterpreterProfile};

use crate::python::{PythonSession, SessionError};

/// Run `f` inside a freshly opened session on the endpoint's default
/// channel.
///
/// The session is closed on every exit path: after `f` completes, and
/// before the error propagates when `f` fails. Close problems are logged
/// and never mask `f`'s own result. `f` must leave the session open; the
/// scope owns the lifecycle.
///
/// ```ignore
/// use futures::FutureExt;
/// use replink_session::with_python;
///
/// let out = with_python(&node, |py| async move { py.cmd("2+2").await }.boxed()).await?;
/// ```
///
/// # Errors
/// Propagates `open` failures, then `f`'s error.
pub async fn with_python<'e, E, T, F>(endpoint: &'e E, f: F) -> Result<T, SessionError>
where
    E: Endpoint + ?Sized,
    F: for<'s> FnOnce(&'s mut PythonSession<'e, E>) -> BoxFuture<'s, Result<T, SessionError>>,
{
    with_python_on(endpoint, DEFAULT_CHANNEL, InterpreterProfile::default(), f).await
}

/// Like [`with_python`], with an explicit channel name and interpreter
/// profile.
///
/// # Errors
/// Propagates `open` failures, then `f`'s error.
pub async fn with_python_on<'e, E, T, F>(
    endpoint: &'e E,
    channel_name: &str,
    profile: InterpreterProfile,
    f: F,
) -> Result<T, SessionError>
where
    E: Endpoint + ?Sized,
    F: for<'s> FnOnce(&'s mut PythonSession<'e, E>) -> BoxFuture<'s, Result<T, SessionError>>,
{
    let mut session = PythonSession::with_profile(endpoint, channel_name, profile);
    session.open().await?;

    let result = f(&mut session).await;

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "session close failed during scope exit");
    }
    result
}

#[cfg(test)]
mod tests {
    use replink_core::ChannelError;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::testing::{ScriptedEndpoint, prompt_reply, timeout_reply};

    #[tokio::test]
    async fn scope_opens_runs_and_closes() {
        let (endpoint, sent) = ScriptedEndpoint::new(vec![
            prompt_reply(""),
            prompt_reply(""),
            prompt_reply(""),
            prompt_reply("4"),
        ]);

        let out = assert_ok!(
            with_python(&endpoint, |py| Box::pin(async move { py.cmd("2+2").await })).await
        );
        assert_eq!(out, "4\n>>> ");
        assert_eq!(sent.lock().unwrap().last().unwrap(), "exit()");
    }

    #[tokio::test]
    async fn scope_closes_after_body_error() {
        // The body fails mid-scope; the termination directive still goes
        // out before the error escapes.
        let (endpoint, sent) = ScriptedEndpoint::new(vec![
            prompt_reply(""),
            prompt_reply(""),
            prompt_reply(""),
            timeout_reply(),
        ]);

        let err = assert_err!(
            with_python(&endpoint, |py| Box::pin(async move { py.cmd("hang").await })).await
        );
        assert!(matches!(
            err,
            SessionError::Channel(ChannelError::PromptTimeout { .. })
        ));
        assert_eq!(sent.lock().unwrap().last().unwrap(), "exit()");
    }

    #[tokio::test]
    async fn scope_open_failure_skips_body_and_close() {
        let (endpoint, sent) = ScriptedEndpoint::new(vec![timeout_reply()]);

        let err = assert_err!(
            with_python(&endpoint, |py| {
                Box::pin(async move { py.cmd("unreached").await })
            })
            .await
        );
        assert!(matches!(
            err,
            SessionError::Channel(ChannelError::PromptTimeout { .. })
        ));
        // Only the launch directive went out; no termination for a session
        // that never opened.
        assert_eq!(*sent.lock().unwrap(), vec!["python".to_string()]);
    }

    #[tokio::test]
    async fn scope_with_custom_channel_and_profile() {
        let (endpoint, sent) = ScriptedEndpoint::new(vec![
            Ok("% ".to_string()),
            Ok("% ".to_string()),
            Ok("% ".to_string()),
            Ok("pong\n% ".to_string()),
        ]);
        let profile = InterpreterProfile::python().with_prompt("% ");

        let out = assert_ok!(
            with_python_on(&endpoint, "mgmt", profile, |py| {
                Box::pin(async move { py.cmd("ping").await })
            })
            .await
        );
        assert_eq!(out, "pong\n% ");
        assert_eq!(sent.lock().unwrap().last().unwrap(), "exit()");
    }
}
