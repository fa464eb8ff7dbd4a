use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct MemorySample {
    pub label: String,
    /// Resident set size of this process; 0 when it could not be read.
    pub used_mb: u64,
    pub taken_at: DateTime<Utc>,
    /// Monotonic offset from the sampler's creation.
    pub since_start_ms: u64,
}

/// Observes process memory between run phases. Never fails.
pub struct MemorySampler {
    system: System,
    pid: Option<Pid>,
    started: Instant,
}

impl MemorySampler {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!(target: "duck_merge::memory", error = e, "Process id unavailable, memory samples will read 0");
                None
            }
        };
        Self {
            system: System::new(),
            pid,
            started: Instant::now(),
        }
    }

    pub fn sample(&mut self, label: impl Into<String>) -> MemorySample {
        let sample = MemorySample {
            label: label.into(),
            used_mb: self.resident_mb(),
            taken_at: Utc::now(),
            since_start_ms: self.started.elapsed().as_millis() as u64,
        };
        info!(
            target: "duck_merge::memory",
            label = %sample.label,
            used_mb = sample.used_mb,
            "Used memory: {} MB",
            sample.used_mb
        );
        sample
    }

    fn resident_mb(&mut self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        self.system
            .process(pid)
            .map(|p| p.memory() / (1024 * 1024))
            .unwrap_or(0)
    }
}

impl Default for MemorySampler {
    fn default() -> Self {
        Self::new()
    }
}
