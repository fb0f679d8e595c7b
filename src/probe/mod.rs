//! Reachability probing.
//!
//! Fans one liveness probe per target out over a bounded pool, collects the
//! results as they complete, and supports cooperative interruption that
//! keeps whatever has finished so far.

pub mod ping;
pub mod rate_limiter;
pub mod traits;

pub use ping::PingProber;
pub use rate_limiter::RateLimiter;
pub use traits::{
    ProbeError, ProbeJobConfig, ProbeResult, Prober, SweepOutcome, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_WORKERS,
};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Resolve once `true` is published on `interrupt`.
///
/// A dropped sender means nobody can interrupt any more, so this never
/// resolves in that case.
pub async fn interrupted(interrupt: &mut watch::Receiver<bool>) {
    if interrupt.wait_for(|&stop| stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Probe every target and return the reachable ones in ascending order.
///
/// `on_result` sees each result as it arrives. Publishing `true` on
/// `interrupt` stops dispatch at once and returns the partial outcome;
/// in-flight probes are dropped rather than awaited. The only error is
/// [`ProbeError::ToolMissing`], which aborts the sweep.
pub async fn run_sweep<F>(
    prober: Arc<dyn Prober>,
    targets: &[Ipv4Addr],
    config: &ProbeJobConfig,
    mut interrupt: watch::Receiver<bool>,
    mut on_result: F,
) -> Result<SweepOutcome, ProbeError>
where
    F: FnMut(&ProbeResult),
{
    let limiter = RateLimiter::new(config.rate_limit);
    let progress = config.progress.then(|| progress_bar(targets.len()));
    let timeout = config.timeout;

    debug!(
        prober = prober.name(),
        targets = targets.len(),
        concurrency = config.concurrency,
        ?timeout,
        "starting sweep"
    );

    let mut probes = stream::iter(targets.iter().copied())
        .map(|target| {
            let prober = Arc::clone(&prober);
            let limiter = limiter.clone();
            async move {
                if let Some(limiter) = limiter {
                    limiter.wait().await;
                }
                let reachable =
                    match tokio::time::timeout(timeout, prober.probe(target, timeout)).await {
                        Ok(result) => result?,
                        Err(_) => false,
                    };
                Ok::<_, ProbeError>(ProbeResult::new(target, reachable))
            }
        })
        .buffer_unordered(config.concurrency.max(1));

    let mut outcome = SweepOutcome::default();

    loop {
        tokio::select! {
            biased;
            _ = interrupted(&mut interrupt) => {
                info!(completed = outcome.completed, "sweep interrupted");
                outcome.interrupted = true;
                break;
            }
            next = probes.next() => match next {
                Some(Ok(result)) => {
                    outcome.completed += 1;
                    if result.reachable {
                        outcome.active.push(result.address);
                    }
                    match &progress {
                        Some(pb) => {
                            pb.inc(1);
                            pb.set_message(format!("{} active", outcome.active.len()));
                            pb.suspend(|| on_result(&result));
                        }
                        None => on_result(&result),
                    }
                }
                Some(Err(e)) => {
                    if let Some(pb) = &progress {
                        pb.abandon();
                    }
                    return Err(e);
                }
                None => break,
            }
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    outcome.active.sort_unstable();
    debug!(
        active = outcome.active.len(),
        completed = outcome.completed,
        "sweep finished"
    );
    Ok(outcome)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
    )
    .map(|s| s.progress_chars("=>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum Behavior {
        Reply(Duration),
        Silent(Duration),
        Hang,
        Missing,
    }

    struct FakeProber {
        behaviors: HashMap<Ipv4Addr, Behavior>,
        default: Behavior,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeProber {
        fn new(default: Behavior) -> Self {
            Self {
                behaviors: HashMap::new(),
                default,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn with(mut self, last_octet: u8, behavior: Behavior) -> Self {
            self.behaviors.insert(host(last_octet), behavior);
            self
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        fn name(&self) -> &str {
            "fake"
        }

        async fn probe(&self, target: Ipv4Addr, _timeout: Duration) -> Result<bool, ProbeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let behavior = self.behaviors.get(&target).copied().unwrap_or(self.default);
            let result = match behavior {
                Behavior::Reply(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(true)
                }
                Behavior::Silent(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(false)
                }
                Behavior::Hang => std::future::pending().await,
                Behavior::Missing => Err(ProbeError::ToolMissing("ping".to_string())),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn host(last_octet: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, last_octet)
    }

    fn targets(n: u8) -> Vec<Ipv4Addr> {
        (1..=n).map(host).collect()
    }

    fn no_interrupt() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_hosts_sorted_regardless_of_completion_order() {
        let prober = FakeProber::new(Behavior::Silent(ms(5)))
            .with(9, Behavior::Reply(ms(10)))
            .with(5, Behavior::Reply(ms(50)))
            .with(2, Behavior::Reply(ms(100)));

        let mut seen = Vec::new();
        let outcome = run_sweep(
            Arc::new(prober),
            &targets(10),
            &ProbeJobConfig::new(),
            no_interrupt(),
            |r| {
                if r.reachable {
                    seen.push(r.address)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(seen, vec![host(9), host(5), host(2)]);
        assert_eq!(outcome.active, vec![host(2), host(5), host(9)]);
        assert_eq!(outcome.completed, 10);
        assert!(!outcome.interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_unreachable() {
        let prober = FakeProber::new(Behavior::Reply(ms(1)))
            .with(2, Behavior::Reply(Duration::from_secs(10)))
            .with(3, Behavior::Hang);

        let config = ProbeJobConfig::new().with_timeout(ms(1500));
        let outcome = run_sweep(Arc::new(prober), &targets(3), &config, no_interrupt(), |_| {})
            .await
            .unwrap();

        assert_eq!(outcome.active, vec![host(1)]);
        assert_eq!(outcome.completed, 3);
    }

    #[tokio::test]
    async fn test_missing_tool_aborts_sweep() {
        let prober = FakeProber::new(Behavior::Missing);
        let result = run_sweep(
            Arc::new(prober),
            &targets(254),
            &ProbeJobConfig::new(),
            no_interrupt(),
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(ProbeError::ToolMissing(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_returns_partial_results() {
        let prober = FakeProber::new(Behavior::Hang)
            .with(9, Behavior::Reply(ms(1)))
            .with(3, Behavior::Reply(ms(2)))
            .with(5, Behavior::Silent(ms(3)))
            .with(7, Behavior::Reply(ms(4)));

        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(ms(50)).await;
            let _ = tx.send(true);
        });

        let config = ProbeJobConfig::new().with_timeout(Duration::from_secs(60));
        let outcome = run_sweep(Arc::new(prober), &targets(20), &config, rx, |_| {})
            .await
            .unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.completed, 4);
        assert_eq!(outcome.active, vec![host(3), host(7), host(9)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_before_start_dispatches_nothing() {
        let prober = Arc::new(FakeProber::new(Behavior::Reply(ms(1))));
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let outcome = run_sweep(prober.clone(), &targets(10), &ProbeJobConfig::new(), rx, |_| {})
            .await
            .unwrap();

        assert!(outcome.interrupted);
        assert!(outcome.active.is_empty());
        assert_eq!(prober.peak.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let prober = Arc::new(FakeProber::new(Behavior::Silent(ms(10))));
        let config = ProbeJobConfig::new().with_concurrency(4);

        let outcome = run_sweep(prober.clone(), &targets(40), &config, no_interrupt(), |_| {})
            .await
            .unwrap();

        assert_eq!(outcome.completed, 40);
        assert_eq!(prober.peak.load(Ordering::SeqCst), 4);
    }
}
