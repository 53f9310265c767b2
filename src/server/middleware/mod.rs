//! HTTP middleware
//!
//! - Request ID tracking
//! - Request timing for the performance monitor

mod request_id;
mod timing;


pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdService};
pub use timing::{RequestTiming, RequestTimingService};
