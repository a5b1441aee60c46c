//! Scan coordinator.
//!
//! Spawns a bounded pool of probe workers over a shared [`WorkQueue`] and
//! collects their outcomes over a channel. The collector loop is the only
//! owner of the open-port list and the scanned counter, so observer
//! callbacks are delivered one at a time from a single context.

use super::policy::ScanPolicy;
use super::probe::{OpenPort, ProbeOutcome, Prober, TcpProber};
use super::queue::WorkQueue;
use crate::error::ScanResult;
use crate::types::{Port, ScanTarget};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Receives scan events as they happen.
///
/// Both methods default to no-ops. `on_result` fires once per open port in
/// discovery order; `on_progress` fires after every probe. For a given port,
/// `on_result` always fires before the progress tick that counts it.
pub trait ScanObserver {
    fn on_result(&mut self, _port: Port, _service: &str) {}

    fn on_progress(&mut self, _scanned: usize, _total: usize) {}
}

/// The no-op observer.
impl ScanObserver for () {}

impl<O: ScanObserver + ?Sized> ScanObserver for &mut O {
    fn on_result(&mut self, port: Port, service: &str) {
        (**self).on_result(port, service);
    }

    fn on_progress(&mut self, scanned: usize, total: usize) {
        (**self).on_progress(scanned, total);
    }
}

type ResultFn<'a> = Box<dyn FnMut(Port, &str) + Send + 'a>;
type ProgressFn<'a> = Box<dyn FnMut(usize, usize) + Send + 'a>;

/// Observer assembled from optional closures.
///
/// ```ignore
/// let mut hooks = Hooks::new()
///     .on_result(|port, service| println!("Port {port}: OPEN - {service}"))
///     .on_progress(|scanned, total| eprintln!("{scanned}/{total}"));
/// let results = scan(&target, policy, &mut hooks).await?;
/// ```
#[derive(Default)]
pub struct Hooks<'a> {
    on_result: Option<ResultFn<'a>>,
    on_progress: Option<ProgressFn<'a>>,
}

impl<'a> Hooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_result(mut self, f: impl FnMut(Port, &str) + Send + 'a) -> Self {
        self.on_result = Some(Box::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl FnMut(usize, usize) + Send + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

impl ScanObserver for Hooks<'_> {
    fn on_result(&mut self, port: Port, service: &str) {
        if let Some(f) = self.on_result.as_mut() {
            f(port, service);
        }
    }

    fn on_progress(&mut self, scanned: usize, total: usize) {
        if let Some(f) = self.on_progress.as_mut() {
            f(scanned, total);
        }
    }
}

/// Frozen outcome of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub target: ScanTarget,
    /// Per-probe timeout the scan ran with.
    pub timeout: Duration,
    /// Open ports, sorted ascending by port.
    pub open_ports: Vec<OpenPort>,
    pub ports_scanned: usize,
    pub total_ports: usize,
    pub duration: Duration,
    /// True when the scan was stopped before every port was probed.
    pub cancelled: bool,
}

impl ScanResults {
    pub fn open_count(&self) -> usize {
        self.open_ports.len()
    }

    /// Every port was probed.
    pub fn is_complete(&self) -> bool {
        self.ports_scanned == self.total_ports
    }

    /// Open port numbers, ascending.
    pub fn ports(&self) -> Vec<u16> {
        self.open_ports.iter().map(|p| p.port.as_u16()).collect()
    }

    /// One-line status in the style of the front end.
    pub fn summary(&self) -> String {
        if self.cancelled {
            format!(
                "Scan stopped by user - {} open port(s) in {}/{} ports",
                self.open_count(),
                self.ports_scanned,
                self.total_ports
            )
        } else if self.open_ports.is_empty() {
            "Scan complete - No open ports found".to_string()
        } else {
            format!("Scan complete - Found {} open port(s)", self.open_count())
        }
    }
}

/// Scan `target` with `policy`, reporting to `observer`.
///
/// Resolves the host once, then probes every port in the range. Resolution
/// failure is the only error; per-port failures just count as "not open".
pub async fn scan<O>(
    target: &ScanTarget,
    policy: ScanPolicy,
    observer: &mut O,
) -> ScanResult<ScanResults>
where
    O: ScanObserver + ?Sized,
{
    scan_with_cancel(target, policy, observer, CancellationToken::new()).await
}

/// Like [`scan`], stopping early once `cancel` fires.
pub async fn scan_with_cancel<O>(
    target: &ScanTarget,
    policy: ScanPolicy,
    observer: &mut O,
    cancel: CancellationToken,
) -> ScanResult<ScanResults>
where
    O: ScanObserver + ?Sized,
{
    let ip = target.resolve().await?;
    let prober = TcpProber::new(ip, policy.timeout);

    Ok(Coordinator::new(prober, policy)
        .with_cancel(cancel)
        .run(target, observer)
        .await)
}

/// Drives a pool of workers over one queue.
pub struct Coordinator<P> {
    prober: Arc<P>,
    policy: ScanPolicy,
    cancel: CancellationToken,
}

impl<P: Prober> Coordinator<P> {
    pub fn new(prober: P, policy: ScanPolicy) -> Self {
        Self {
            prober: Arc::new(prober),
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Workers check this token before claiming each port.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Probe every port of `target`, in shuffled order if the policy asks.
    pub async fn run<O>(&self, target: &ScanTarget, observer: &mut O) -> ScanResults
    where
        O: ScanObserver + ?Sized,
    {
        let queue = WorkQueue::from_range(target.ports(), self.policy.randomize);
        self.run_queue(queue, target, observer).await
    }

    /// Probe the ports of an explicit queue, in the queue's order.
    pub async fn run_queue<O>(
        &self,
        queue: WorkQueue,
        target: &ScanTarget,
        observer: &mut O,
    ) -> ScanResults
    where
        O: ScanObserver + ?Sized,
    {
        let started = Instant::now();
        let total = queue.len();
        let workers = self.policy.effective_workers(total);

        let mut results = ScanResults {
            target: target.clone(),
            timeout: self.policy.timeout,
            open_ports: Vec::new(),
            ports_scanned: 0,
            total_ports: total,
            duration: Duration::ZERO,
            cancelled: false,
        };

        if workers == 0 {
            return results;
        }

        info!(
            host = %target,
            total,
            workers,
            randomize = self.policy.randomize,
            delay_ms = self.policy.inter_probe_delay.as_millis() as u64,
            "starting scan"
        );

        let queue = Arc::new(queue);
        let (tx, mut rx) = mpsc::channel::<(Port, ProbeOutcome)>(workers * 2);
        let mut set = JoinSet::new();

        for id in 0..workers {
            set.spawn(worker(
                id,
                Arc::clone(&queue),
                Arc::clone(&self.prober),
                tx.clone(),
                self.cancel.clone(),
                self.policy.inter_probe_delay,
            ));
        }
        // Only workers hold senders now; the loop ends when the last one exits.
        drop(tx);

        while let Some((port, outcome)) = rx.recv().await {
            if let ProbeOutcome::Open(open) = outcome {
                debug!(port = %open.port, service = %open.service, "open port");
                observer.on_result(open.port, &open.service);
                results.open_ports.push(open);
            } else {
                tracing::trace!(%port, ?outcome, "port not open");
            }

            results.ports_scanned += 1;
            observer.on_progress(results.ports_scanned, total);
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "probe worker failed");
            }
        }

        results.open_ports.sort_by_key(|p| p.port);
        results.duration = started.elapsed();
        results.cancelled = self.cancel.is_cancelled() && !results.is_complete();

        if results.cancelled {
            warn!(
                scanned = results.ports_scanned,
                total, "scan cancelled before completion"
            );
        }
        info!(
            open = results.open_count(),
            scanned = results.ports_scanned,
            elapsed_ms = results.duration.as_millis() as u64,
            "scan finished"
        );

        results
    }
}

/// Claim ports until the queue is empty or the scan is cancelled.
async fn worker<P: Prober>(
    id: usize,
    queue: Arc<WorkQueue>,
    prober: Arc<P>,
    tx: mpsc::Sender<(Port, ProbeOutcome)>,
    cancel: CancellationToken,
    delay: Duration,
) {
    let mut probed = 0usize;

    while !cancel.is_cancelled() {
        let Some(port) = queue.next() else {
            break;
        };

        if !delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let outcome = prober.probe(port).await;
        probed += 1;

        if tx.send((port, outcome)).await.is_err() {
            break;
        }
    }

    debug!(worker = id, probed, "worker finished");
}
