//! Metrics collection and aggregation
//!
//! Request and database timings are smoothed with exponential moving averages;
//! cpu and memory readings are kept in capped historical series.

mod bounded;
mod collector;
mod ema;
mod storage;
mod system;

#[cfg(test)]
mod tests;

pub(crate) use bounded::BoundedPush;
pub use bounded::DEFAULT_HISTORY_CAPACITY;
pub use collector::MetricsCollector;
pub use ema::{DEFAULT_ALPHA, Ema};
pub use system::{HostSystemProbe, StaticSystemProbe, SystemProbe};
