pub mod system;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuSample {
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    pub percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub sent_bytes: u64,
    pub recv_bytes: u64,
}

#[derive(Debug, Error, Clone)]
pub enum CollectError {
    #[error("{metric} unavailable: {reason}")]
    Unavailable {
        metric: &'static str,
        reason: String,
    },
}

pub trait MetricsSource {
    async fn cpu_percent(&mut self) -> Result<CpuSample, CollectError>;
    fn memory(&mut self) -> Result<MemorySample, CollectError>;
    fn net_counters(&mut self) -> Result<NetCounters, CollectError>;
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
