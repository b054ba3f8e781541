/// Background jobs
pub mod advancement;

pub use advancement::AdvancementScheduler;
