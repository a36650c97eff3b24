use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ChatSession;
use crate::infrastructure::AppConfig;

/// The single session this server fronts. Requests take turns on the mutex,
/// so the session itself never sees concurrent calls.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<ChatSession>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(session: ChatSession, config: AppConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(config),
        }
    }
}
