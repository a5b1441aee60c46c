//! Scan policy: how hard and in what order the target is probed.

use std::time::Duration;

/// Per-scan configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Connect timeout per probe.
    pub timeout: Duration,
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,
    /// Shuffle the probe order.
    pub randomize: bool,
    /// Sleep before each probe, per worker.
    pub inter_probe_delay: Duration,
}

impl ScanPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300);
    pub const DEFAULT_CONCURRENCY: usize = 200;

    pub fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            concurrency: Self::DEFAULT_CONCURRENCY,
            randomize: false,
            inter_probe_delay: Duration::ZERO,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_probe_delay = delay;
        self
    }

    /// Number of workers to spawn for `total_ports` ports.
    ///
    /// `min(concurrency, total_ports)`, but at least one when there is work.
    pub fn effective_workers(&self, total_ports: usize) -> usize {
        if total_ports == 0 {
            0
        } else {
            self.concurrency.clamp(1, total_ports)
        }
    }

    /// True when either stealth control is active.
    pub fn is_stealthy(&self) -> bool {
        self.randomize || !self.inter_probe_delay.is_zero()
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = ScanPolicy::default();
        assert_eq!(policy.timeout, Duration::from_millis(300));
        assert_eq!(policy.concurrency, 200);
        assert!(!policy.is_stealthy());
    }

    #[test]
    fn test_effective_workers() {
        let policy = ScanPolicy::new().with_concurrency(10);
        assert_eq!(policy.effective_workers(16), 10);
        assert_eq!(policy.effective_workers(3), 3);
        assert_eq!(policy.effective_workers(1), 1);
        assert_eq!(policy.effective_workers(0), 0);

        let zero = ScanPolicy::new().with_concurrency(0);
        assert_eq!(zero.effective_workers(5), 1);
    }

    #[test]
    fn test_stealth_flags() {
        assert!(ScanPolicy::new().with_randomize(true).is_stealthy());
        assert!(ScanPolicy::new()
            .with_delay(Duration::from_millis(50))
            .is_stealthy());
    }
}
