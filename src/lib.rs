pub mod config;
pub mod error;
pub mod habit;
pub mod rest;
pub mod store;

use std::sync::Arc;

use config::HabitdConfig;
use habit::HabitModel;

/// Shared application state passed to every request handler.
///
/// Built once at startup and injected via axum state — the habit model
/// (and the lock it owns) is never ambient global state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<HabitdConfig>,
    pub habit: Arc<HabitModel>,
    pub started_at: std::time::Instant,
}
