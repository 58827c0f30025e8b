//! Remote Todo
//!
//! Interactive client for a remote todo collection. Loads the signed-in
//! user's tasks on startup, then hands control to the shell.

mod controller;
mod shell;
mod view;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rt_core::auth::{FixedAuth, User};
use rt_core::task::HttpTaskClient;

use crate::controller::Controller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rt_app=debug,rt_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url =
        std::env::var("TODO_API_URL").unwrap_or_else(|_| "http://localhost:8081/api".to_string());

    let user = match std::env::var("TODO_USER_ID") {
        Ok(raw) => {
            let id: i64 = raw
                .parse()
                .with_context(|| format!("TODO_USER_ID must be an integer, got {:?}", raw))?;
            Some(User::new(id))
        }
        Err(_) => None,
    };

    tracing::info!("Using task API at {}", base_url);
    match &user {
        Some(user) => tracing::info!("Signed in as user {}", user.id),
        None => tracing::warn!("TODO_USER_ID not set, running unauthenticated"),
    }

    let api = Arc::new(HttpTaskClient::new(base_url));
    let auth = Arc::new(FixedAuth::new(user));
    let controller = Arc::new(Controller::new(api, auth));

    controller.load().await;

    shell::run(controller).await
}
