use std::sync::Arc;

use crate::config::Config;
use crate::forest::cache::LayoutStore;
use crate::forest::engine::LayoutEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Validated layout engine; generation runs on the blocking pool.
    pub engine: Arc<LayoutEngine>,
    /// Pluggable layout cache. Default: in-memory. Redis when `REDIS_URL` is set.
    pub layouts: Arc<dyn LayoutStore>,
}
