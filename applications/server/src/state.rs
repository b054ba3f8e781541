/// Shared application state
use crate::services::{AuthService, EventBus, QueueService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<QueueService>,
    pub auth_service: Arc<AuthService>,
    pub events: Arc<EventBus>,
}

impl AppState {
    pub fn new(
        queue: Arc<QueueService>,
        auth_service: Arc<AuthService>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            queue,
            auth_service,
            events,
        }
    }
}
