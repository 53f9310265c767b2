//! Platform services started by the bootstrapper

pub mod cache;
pub mod jobs;
pub mod realtime;

pub use cache::{CacheStats, SnapshotCache};
pub use jobs::{Job, JobHandler, JobQueue, JobStats, NOTIFICATIONS_QUEUE};
pub use realtime::RealtimeHub;
