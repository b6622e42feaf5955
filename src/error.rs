use crate::collectors::CollectError;
use crate::journal::JournalError;
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchdogErrorKind {
    #[error("metrics read failed")]
    Collect(#[source] CollectError),
    #[error("event log unavailable")]
    Journal(#[source] JournalError),
}

#[derive(Debug)]
pub struct WatchdogError {
    kind: WatchdogErrorKind,
    backtrace: Backtrace,
}

impl WatchdogError {
    fn new(kind: WatchdogErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::force_capture(),
        }
    }

    #[cfg(test)]
    pub fn kind(&self) -> &WatchdogErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for WatchdogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl StdError for WatchdogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kind.source()
    }
}

impl From<CollectError> for WatchdogError {
    fn from(err: CollectError) -> Self {
        Self::new(WatchdogErrorKind::Collect(err))
    }
}

impl From<JournalError> for WatchdogError {
    fn from(err: JournalError) -> Self {
        Self::new(WatchdogErrorKind::Journal(err))
    }
}

// Message, then one `source()` per line.
pub fn cause_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    if cause.is_some() {
        out.push_str("\nCaused by:");
    }
    let mut depth = 0;
    while let Some(inner) = cause {
        let _ = write!(out, "\n  {depth}: {inner}");
        depth += 1;
        cause = inner.source();
    }
    out
}

pub fn diagnostic_report(err: &WatchdogError) -> String {
    format!(
        "{}\nStack backtrace:\n{}",
        cause_chain(err),
        err.backtrace()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::backtrace::BacktraceStatus;

    fn disk_full() -> WatchdogError {
        WatchdogError::from(JournalError::Write {
            path: "/var/log/hostwatch.log".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }

    #[test]
    fn chain_adds_detail_at_each_level() {
        let report = cause_chain(&disk_full());
        assert_eq!(
            report,
            "event log unavailable\nCaused by:\n  \
             0: failed to write log file /var/log/hostwatch.log\n  \
             1: disk full"
        );
    }

    #[test]
    fn no_line_of_the_chain_repeats() {
        let report = cause_chain(&disk_full());
        let lines: Vec<&str> = report.lines().map(|l| l.trim()).collect();
        for (i, line) in lines.iter().enumerate() {
            let tail = line.split_once(": ").map(|(_, t)| t).unwrap_or(line);
            assert!(
                !lines[..i].iter().any(|prev| prev.ends_with(tail)),
                "{report}"
            );
        }
    }

    #[test]
    fn collect_failure_names_metric_in_cause() {
        let err = WatchdogError::from(CollectError::Unavailable {
            metric: "cpu",
            reason: "no processors reported".to_string(),
        });
        assert!(matches!(err.kind(), WatchdogErrorKind::Collect(_)));
        assert_eq!(
            cause_chain(&err),
            "metrics read failed\nCaused by:\n  0: cpu unavailable: no processors reported"
        );
    }

    #[test]
    fn report_carries_backtrace_captured_at_construction() {
        let err = disk_full();
        assert_eq!(err.backtrace().status(), BacktraceStatus::Captured);

        let report = diagnostic_report(&err);
        assert!(report.starts_with("event log unavailable\nCaused by:"));
        let (_, trace) = report
            .split_once("\nStack backtrace:\n")
            .expect("backtrace section");
        assert!(!trace.trim().is_empty());
    }

    #[test]
    fn leaf_error_chain_is_single_line() {
        let err = CollectError::Unavailable {
            metric: "memory",
            reason: "total memory reported as zero".to_string(),
        };
        assert_eq!(
            cause_chain(&err),
            "memory unavailable: total memory reported as zero"
        );
    }
}
