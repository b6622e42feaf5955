use crate::collectors::{
    round_tenth, CollectError, CpuSample, MemorySample, MetricsSource, NetCounters,
};
use std::time::Duration;
use sysinfo::{CpuExt, NetworkExt, NetworksExt, System, SystemExt};
use tracing::debug;

const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

pub struct SysinfoSource {
    system: System,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SysinfoSource {
    async fn cpu_percent(&mut self) -> Result<CpuSample, CollectError> {
        self.system.refresh_cpu();
        tokio::time::sleep(CPU_SAMPLE_WINDOW).await;
        self.system.refresh_cpu();

        if self.system.cpus().is_empty() {
            return Err(CollectError::Unavailable {
                metric: "cpu",
                reason: "no processors reported".to_string(),
            });
        }
        let usage = self.system.global_cpu_info().cpu_usage() as f64;
        Ok(CpuSample {
            usage_percent: round_tenth(usage.clamp(0.0, 100.0)),
        })
    }

    fn memory(&mut self) -> Result<MemorySample, CollectError> {
        self.system.refresh_memory();
        let total_bytes = self.system.total_memory();
        if total_bytes == 0 {
            return Err(CollectError::Unavailable {
                metric: "memory",
                reason: "total memory reported as zero".to_string(),
            });
        }
        let available = self.system.available_memory().min(total_bytes);
        let percent = (total_bytes - available) as f64 / total_bytes as f64 * 100.0;

        Ok(MemorySample {
            percent: round_tenth(percent),
            used_bytes: self.system.used_memory(),
            total_bytes,
        })
    }

    fn net_counters(&mut self) -> Result<NetCounters, CollectError> {
        self.system.refresh_networks_list();
        self.system.refresh_networks();

        let counters = self
            .system
            .networks()
            .iter()
            .fold(NetCounters::default(), |acc, (_iface, data)| NetCounters {
                sent_bytes: acc.sent_bytes.saturating_add(data.total_transmitted()),
                recv_bytes: acc.recv_bytes.saturating_add(data.total_received()),
            });
        debug!(
            sent = counters.sent_bytes,
            recv = counters.recv_bytes,
            "network counters sampled"
        );
        Ok(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reads_nonzero_total() {
        let mut source = SysinfoSource::new();
        let sample = source.memory().expect("memory must be readable on the test host");
        assert!(sample.total_bytes > 0);
        assert!((0.0..=100.0).contains(&sample.percent));
    }

    #[test]
    fn net_counters_do_not_go_backwards_between_reads() {
        let mut source = SysinfoSource::new();
        let first = source.net_counters().expect("first read");
        let second = source.net_counters().expect("second read");
        assert!(second.sent_bytes >= first.sent_bytes);
        assert!(second.recv_bytes >= first.recv_bytes);
    }
}
