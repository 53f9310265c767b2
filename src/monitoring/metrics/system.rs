//! Host system sampling using the sysinfo crate
//!
//! Real readings require the `metrics` feature; without it every reading is zero.

use crate::monitoring::types::SystemMetrics;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(feature = "metrics")]
use parking_lot::Mutex;
#[cfg(feature = "metrics")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Source of system readings for the collection loop
#[async_trait]
pub trait SystemProbe: Send + Sync {
    async fn sample(&self) -> SystemMetrics;
}

/// Samples the current process and host
///
/// CPU is the process CPU time consumed over a short window divided by the
/// window's wall-clock length. It approximates process load rather than
/// instantaneous OS usage and can exceed 100 on multi-core hosts.
pub struct HostSystemProbe {
    window: Duration,
    #[cfg(feature = "metrics")]
    system: Mutex<System>,
    #[cfg(feature = "metrics")]
    pid: Option<Pid>,
}

impl std::fmt::Debug for HostSystemProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSystemProbe")
            .field("window", &self.window)
            .finish()
    }
}

impl HostSystemProbe {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            #[cfg(feature = "metrics")]
            system: Mutex::new(System::new()),
            #[cfg(feature = "metrics")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }
}

#[cfg(feature = "metrics")]
impl HostSystemProbe {
    fn refresh_process(&self) {
        if let Some(pid) = self.pid {
            self.system
                .lock()
                .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        }
    }

    fn process_cpu(&self) -> f64 {
        self.pid
            .and_then(|pid| {
                self.system
                    .lock()
                    .process(pid)
                    .map(|p| p.cpu_usage() as f64)
            })
            .unwrap_or(0.0)
    }

    fn read_host(&self, cpu_percent: f64) -> SystemMetrics {
        let mut system = self.system.lock();
        system.refresh_memory();

        let total = system.total_memory();
        let free = system.available_memory();
        let memory_percent = if total == 0 {
            0.0
        } else {
            total.saturating_sub(free) as f64 / total as f64 * 100.0
        };
        let load = System::load_average();

        SystemMetrics {
            cpu_percent,
            memory_percent,
            free_memory_bytes: free,
            total_memory_bytes: total,
            uptime_seconds: System::uptime(),
            load_average: [load.one, load.five, load.fifteen],
        }
    }
}

#[cfg(feature = "metrics")]
#[async_trait]
impl SystemProbe for HostSystemProbe {
    async fn sample(&self) -> SystemMetrics {
        self.refresh_process();
        tokio::time::sleep(self.window).await;
        self.refresh_process();

        let cpu = self.process_cpu();
        self.read_host(cpu)
    }
}

#[cfg(not(feature = "metrics"))]
#[async_trait]
impl SystemProbe for HostSystemProbe {
    async fn sample(&self) -> SystemMetrics {
        SystemMetrics::default()
    }
}

/// Probe returning a fixed reading, for tests and benchmarks
#[derive(Debug, Default)]
pub struct StaticSystemProbe {
    reading: parking_lot::RwLock<SystemMetrics>,
}

impl StaticSystemProbe {
    pub fn new(reading: SystemMetrics) -> Self {
        Self {
            reading: parking_lot::RwLock::new(reading),
        }
    }

    /// Replace the reading returned by later samples
    pub fn set(&self, reading: SystemMetrics) {
        *self.reading.write() = reading;
    }
}

#[async_trait]
impl SystemProbe for StaticSystemProbe {
    async fn sample(&self) -> SystemMetrics {
        self.reading.read().clone()
    }
}
