//! Supplementary service configuration

use serde::{Deserialize, Serialize};

/// Realtime hub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Notifications buffered per subscriber before it starts lagging
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Background job queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Jobs buffered before `enqueue` starts rejecting
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_channel_capacity() -> usize {
    256
}

fn default_queue_capacity() -> usize {
    1024
}
