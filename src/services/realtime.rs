//! In-process broadcast hub for realtime notifications

use crate::bootstrap::{ManagedService, ServiceHealthReport};
use crate::config::RealtimeConfig;
use crate::monitoring::alerts::{AlertNotifier, AlertSeverity, Notification};
use crate::monitoring::metrics::Ema;
use crate::monitoring::types::RealtimeMetrics;
use crate::monitoring::RealtimeStatsSource;
use crate::utils::error::{FormulaError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Message-rate window: when it was last read and the publish count at that time
#[derive(Debug)]
struct RateWindow {
    since: Instant,
    published_at_start: u64,
}

/// Fan-out hub; every subscriber sees every published notification
#[derive(Debug)]
pub struct RealtimeHub {
    sender: broadcast::Sender<Notification>,
    running: AtomicBool,
    published: AtomicU64,
    window: Mutex<RateWindow>,
    latency: Mutex<Ema>,
}

impl RealtimeHub {
    pub fn new(config: &RealtimeConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            running: AtomicBool::new(false),
            published: AtomicU64::new(0),
            window: Mutex::new(RateWindow {
                since: Instant::now(),
                published_at_start: 0,
            }),
            latency: Mutex::new(Ema::default()),
        }
    }

    /// Subscribe to every notification published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Publish a notification, returning how many subscribers received it
    pub fn publish(&self, notification: Notification) -> Result<usize> {
        if !self.is_running() {
            return Err(FormulaError::notification("realtime hub is not running"));
        }

        let started = Instant::now();
        // Sending with no subscribers is not an error for a broadcast hub
        let receivers = self.sender.send(notification).unwrap_or(0);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.published.fetch_add(1, Ordering::Relaxed);
        self.latency.lock().update(elapsed_ms);
        debug!("Published notification to {} subscribers", receivers);
        Ok(receivers)
    }

    pub fn connection_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl RealtimeStatsSource for RealtimeHub {
    /// Gauges since the previous call; the message rate covers that interval
    fn realtime_stats(&self) -> RealtimeMetrics {
        let published = self.published_count();
        let now = Instant::now();

        let messages_per_second = {
            let mut window = self.window.lock();
            let elapsed = now.duration_since(window.since).as_secs_f64();
            let sent = published.saturating_sub(window.published_at_start);
            window.since = now;
            window.published_at_start = published;
            if elapsed > 0.0 { sent as f64 / elapsed } else { 0.0 }
        };

        RealtimeMetrics {
            active_connections: self.connection_count() as u64,
            messages_per_second,
            avg_latency_ms: self.latency.lock().value(),
        }
    }
}

#[async_trait]
impl AlertNotifier for RealtimeHub {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.publish(notification.clone()).map(|_| ())
    }

    fn name(&self) -> &str {
        "realtime"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= AlertSeverity::Critical
    }
}

#[async_trait]
impl ManagedService for RealtimeHub {
    async fn initialize(&self) -> Result<()> {
        self.running.store(true, Ordering::Release);
        info!("Realtime hub started");
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.running.store(false, Ordering::Release);
        info!("Realtime hub stopped");
        Ok(())
    }

    async fn health_check(&self) -> Result<ServiceHealthReport> {
        if !self.is_running() {
            return Ok(ServiceHealthReport::error("not running"));
        }
        Ok(ServiceHealthReport::operational()
            .with_metadata("connections", serde_json::json!(self.connection_count()))
            .with_metadata("published", serde_json::json!(self.published_count())))
    }
}
