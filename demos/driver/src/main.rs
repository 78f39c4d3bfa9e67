//! Example driver running a short interpreter session on a local node.
//!
//! Run with: cargo run -p driver-example
//!
//! Requires a `python` executable on PATH.

use futures::FutureExt;
use replink_session::with_python;
use replink_transport::LocalEndpoint;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let node = LocalEndpoint::new();

    let result = with_python(&node, |py| {
        async move {
            for command in ["2+2", "import os", "os.getpid()"] {
                let response = py.cmd(command).await?;
                println!("--- {command}");
                println!("{response}");
            }
            Ok(())
        }
        .boxed()
    })
    .await;

    if let Err(e) = result {
        tracing::error!("session failed: {e}");
        std::process::exit(1);
    }
}
