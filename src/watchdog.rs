use crate::checks::{cpu_alert, ram_alert, NetworkCheck};
use crate::collectors::MetricsSource;
use crate::config::WatchdogConfig;
use crate::error::{cause_chain, diagnostic_report, WatchdogError};
use crate::journal::EventJournal;
use crate::retention::{enforce_retention, RetentionAction};
use chrono::Local;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const STARTED_MESSAGE: &str = "🔍 System monitoring started";
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub alerts: usize,
    pub retention: RetentionAction,
}

pub struct Watchdog<S> {
    cfg: WatchdogConfig,
    source: S,
    journal: EventJournal,
    network: NetworkCheck,
}

impl<S: MetricsSource> Watchdog<S> {
    // The first network sample becomes the baseline for cycle one.
    pub fn new(cfg: WatchdogConfig, mut source: S) -> Result<Self, WatchdogError> {
        let baseline = source.net_counters()?;
        let network = NetworkCheck::new(baseline, cfg.net_threshold_bytes(), cfg.check_interval());
        let journal = EventJournal::new(cfg.log_path.clone());
        Ok(Self {
            cfg,
            source,
            journal,
            network,
        })
    }

    #[cfg(test)]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub async fn run_cycle(&mut self) -> Result<CycleReport, WatchdogError> {
        let mut alerts = 0;

        let cpu = self.source.cpu_percent().await?;
        if let Some(text) = cpu_alert(&cpu, self.cfg.cpu_threshold_percent) {
            self.journal.log(&text)?;
            alerts += 1;
        }

        let memory = self.source.memory()?;
        if let Some(text) = ram_alert(&memory, self.cfg.ram_threshold_percent) {
            self.journal.log(&text)?;
            alerts += 1;
        }

        let net = self.source.net_counters()?;
        if let Some(text) = self.network.observe(net) {
            self.journal.log(&text)?;
            alerts += 1;
        }

        let retention = enforce_retention(&mut self.journal, self.cfg.retention_idle(), Local::now())?;

        Ok(CycleReport { alerts, retention })
    }

    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        if let Err(err) = self.journal.log(STARTED_MESSAGE) {
            error!(error = %cause_chain(&err), "failed to record startup");
        }

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let pause = match self.run_cycle().await {
                Ok(report) => {
                    debug!(
                        alerts = report.alerts,
                        retention = ?report.retention,
                        "cycle finished"
                    );
                    self.cfg.check_interval()
                }
                Err(err) => {
                    self.report_failure(&err);
                    ERROR_BACKOFF
                }
            };

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        info!("watchdog stopped");
    }

    fn report_failure(&mut self, err: &WatchdogError) {
        warn!(error = %cause_chain(err), "cycle failed");
        let message = format!("[ERROR] Cycle failed: {}", diagnostic_report(err));
        if let Err(log_err) = self.journal.log(&message) {
            error!(error = %cause_chain(&log_err), "failed to record cycle failure");
        }
    }
}
