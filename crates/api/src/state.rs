use std::sync::Arc;

use restyle_leonardo::workflow::ImageWorkflow;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Handlers run
/// independent workflow invocations; the only thing they share is the
/// HTTP connection pool inside the workflow's client and the immutable
/// configuration.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The Leonardo workflow orchestrator.
    pub workflow: Arc<ImageWorkflow>,
}
