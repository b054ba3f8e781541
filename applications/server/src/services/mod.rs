/// Server services
pub mod auth;
pub mod events;
pub mod queue;

pub use auth::AuthService;
pub use events::EventBus;
pub use queue::QueueService;
