pub mod graceful_shutdown;
pub mod scheduler;

pub use graceful_shutdown::{GracefulShutdown, ShutdownReason, ShutdownToken};
pub use scheduler::{CycleScheduler, SchedulerStats};
