use crate::collectors::{CpuSample, MemorySample, NetCounters};
use crate::format::format_bytes;
use std::time::Duration;

pub fn cpu_alert(sample: &CpuSample, threshold_percent: f64) -> Option<String> {
    if sample.usage_percent > threshold_percent {
        Some(format!("⚠️ High CPU usage: {:.1}%", sample.usage_percent))
    } else {
        None
    }
}

pub fn ram_alert(sample: &MemorySample, threshold_percent: f64) -> Option<String> {
    if sample.percent > threshold_percent {
        Some(format!(
            "⚠️ High RAM usage: {:.1}% ({} / {})",
            sample.percent,
            format_bytes(sample.used_bytes),
            format_bytes(sample.total_bytes)
        ))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetDelta {
    pub sent_bytes: u64,
    pub recv_bytes: u64,
}

impl NetDelta {
    // A counter that went backwards counts as zero traffic.
    pub fn between(baseline: NetCounters, current: NetCounters) -> Self {
        Self {
            sent_bytes: current.sent_bytes.saturating_sub(baseline.sent_bytes),
            recv_bytes: current.recv_bytes.saturating_sub(baseline.recv_bytes),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.sent_bytes.saturating_add(self.recv_bytes)
    }
}

#[derive(Debug)]
pub struct NetworkCheck {
    baseline: NetCounters,
    threshold_bytes: u64,
    interval: Duration,
}

impl NetworkCheck {
    pub fn new(baseline: NetCounters, threshold_bytes: u64, interval: Duration) -> Self {
        Self {
            baseline,
            threshold_bytes,
            interval,
        }
    }

    #[cfg(test)]
    pub fn baseline(&self) -> NetCounters {
        self.baseline
    }

    pub fn observe(&mut self, current: NetCounters) -> Option<String> {
        let delta = NetDelta::between(self.baseline, current);
        self.baseline = current;

        let total = delta.total_bytes();
        if total > self.threshold_bytes {
            Some(format!(
                "⚠️ Unusual network traffic: {} in {} (sent={}, recv={})",
                format_bytes(total),
                humantime::format_duration(self.interval),
                format_bytes(delta.sent_bytes),
                format_bytes(delta.recv_bytes)
            ))
        } else {
            None
        }
    }
}
