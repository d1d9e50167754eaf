//! Race coordinator.
//!
//! # Data Flow
//! ```text
//! race(fetcher, endpoints, options)
//!     → spawn one racer task per endpoint (no ordering, no priority)
//!     → racers: Ok → WinnerSlot::offer, Err → failure log
//!     → coordinator: select { winner slot, deadline }
//!     → RaceResult: Won | TimedOut | AllFailed
//!     → CancelSignal raised for whoever is still running
//! ```
//!
//! # State Machine
//! ```text
//! Pending → Won       first success delivered through the slot
//! Pending → TimedOut  deadline elapsed (or all failed, WaitForDeadline)
//! Pending → AllFailed every racer failed (ShortCircuit)
//! ```
//!
//! # Design Decisions
//! - The slot is write-once, so a second winner cannot exist
//! - Failures are logged and collected, never surfaced as the result
//! - Each fetch runs on its own inner task so a panic becomes a failure

pub mod cancel;
pub mod slot;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::schema::{AllFailedPolicy, RaceSettings};
use crate::fetch::{FetchError, Fetcher};
use crate::observability::metrics;
use crate::source::{Endpoint, SourceId};

pub use cancel::CancelSignal;
pub use slot::WinnerSlot;

/// Coordinator settings for one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceOptions {
    pub global_timeout: Duration,
    pub cancel_losers: bool,
    pub all_failed: AllFailedPolicy,
}

impl RaceOptions {
    pub fn new(global_timeout: Duration) -> Self {
        Self {
            global_timeout,
            ..Self::default()
        }
    }
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self::from(&RaceSettings::default())
    }
}

impl From<&RaceSettings> for RaceOptions {
    fn from(settings: &RaceSettings) -> Self {
        Self {
            global_timeout: Duration::from_millis(settings.global_timeout_ms),
            cancel_losers: settings.cancel_losers,
            all_failed: settings.all_failed,
        }
    }
}

/// A failed racer.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: SourceId,
    pub error: FetchError,
}

/// Terminal value of one race.
#[derive(Debug)]
pub enum RaceResult<T> {
    Won { source: SourceId, payload: T },
    TimedOut,
    AllFailed(Vec<SourceFailure>),
}

impl<T> RaceResult<T> {
    pub fn is_won(&self) -> bool {
        matches!(self, RaceResult::Won { .. })
    }

    pub fn winner(&self) -> Option<(&SourceId, &T)> {
        match self {
            RaceResult::Won { source, payload } => Some((source, payload)),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RaceResult::Won { .. } => "won",
            RaceResult::TimedOut => "timed_out",
            RaceResult::AllFailed(_) => "all_failed",
        }
    }
}

#[derive(Debug, Clone, Default)]
struct FailureLog(Arc<Mutex<Vec<SourceFailure>>>);

impl FailureLog {
    fn push(&self, source: SourceId, error: FetchError) {
        let mut failures = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        failures.push(SourceFailure { source, error });
    }

    fn take(&self) -> Vec<SourceFailure> {
        let mut failures = match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *failures)
    }
}

enum Event<T> {
    Delivered(SourceId, T),
    Exhausted,
    Deadline,
}

/// Race `endpoints` against each other and against `options.global_timeout`.
///
/// Returns the first success observed. Failures never end the race early
/// unless every racer failed and the policy is [`AllFailedPolicy::ShortCircuit`].
pub async fn race<F: Fetcher>(
    fetcher: Arc<F>,
    endpoints: Vec<Endpoint>,
    options: &RaceOptions,
) -> RaceResult<F::Payload> {
    let span = tracing::info_span!(
        "race",
        race_id = %Uuid::new_v4(),
        sources = endpoints.len(),
        timeout_ms = options.global_timeout.as_millis() as u64,
    );
    run(fetcher, endpoints, *options).instrument(span).await
}

async fn run<F: Fetcher>(
    fetcher: Arc<F>,
    endpoints: Vec<Endpoint>,
    options: RaceOptions,
) -> RaceResult<F::Payload> {
    let started = Instant::now();
    let deadline = tokio::time::sleep(options.global_timeout);
    tokio::pin!(deadline);

    let (slot, mut winner_rx) = WinnerSlot::channel();
    let failures = FailureLog::default();
    let cancel = CancelSignal::new();

    for endpoint in endpoints {
        let listener = options.cancel_losers.then(|| cancel.subscribe());
        spawn_racer(
            Arc::clone(&fetcher),
            endpoint,
            Arc::clone(&slot),
            failures.clone(),
            listener,
        );
    }
    // Racers hold the only remaining clones; once they are all gone the
    // receiver closes and we know nobody can win.
    drop(slot);

    let event = tokio::select! {
        biased;
        delivered = &mut winner_rx => match delivered {
            Ok((source, payload)) => Event::Delivered(source, payload),
            Err(_) => Event::Exhausted,
        },
        () = &mut deadline => Event::Deadline,
    };

    let result = match event {
        Event::Delivered(source, payload) => {
            tracing::info!(
                source = %source,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Race won"
            );
            RaceResult::Won { source, payload }
        }
        Event::Deadline => {
            tracing::warn!("Race deadline elapsed without a winner");
            RaceResult::TimedOut
        }
        Event::Exhausted => match options.all_failed {
            AllFailedPolicy::ShortCircuit => {
                let failures = failures.take();
                tracing::warn!(failed = failures.len(), "All sources failed");
                RaceResult::AllFailed(failures)
            }
            AllFailedPolicy::WaitForDeadline => {
                tracing::info!("All sources failed; waiting out the race deadline");
                deadline.await;
                RaceResult::TimedOut
            }
        },
    };

    if options.cancel_losers {
        let listening = cancel.trigger();
        if listening > 0 {
            tracing::debug!(listening, "Cancelling losing racers");
        }
    }
    metrics::record_race(result.label(), started.elapsed());
    result
}

fn spawn_racer<F: Fetcher>(
    fetcher: Arc<F>,
    endpoint: Endpoint,
    slot: Arc<WinnerSlot<F::Payload>>,
    failures: FailureLog,
    cancel: Option<broadcast::Receiver<()>>,
) {
    let span = tracing::info_span!("racer", source = %endpoint.source);
    let task = async move {
        let started = Instant::now();
        let source = endpoint.source.clone();

        let inner = tokio::spawn(async move { fetcher.fetch(&endpoint).await }.in_current_span());
        let abort = inner.abort_handle();

        let joined = match cancel {
            Some(mut cancel) => tokio::select! {
                joined = inner => joined,
                _ = cancel.recv() => {
                    abort.abort();
                    tracing::debug!("Racer cancelled");
                    metrics::record_fetch(&source, "cancelled", started.elapsed());
                    return;
                }
            },
            None => inner.await,
        };

        let outcome = joined.unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())));
        let elapsed = started.elapsed();

        match outcome {
            Ok(payload) => {
                metrics::record_fetch(&source, "success", elapsed);
                if slot.offer(source.clone(), payload) {
                    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "Racer delivered first");
                } else {
                    tracing::debug!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Race already decided, discarding result"
                    );
                }
            }
            Err(error) => {
                metrics::record_fetch(&source, error.kind(), elapsed);
                tracing::warn!(
                    error = %error,
                    kind = error.kind(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Source failed"
                );
                failures.push(source, error);
            }
        }
        // Release the slot only after the failure is recorded.
        drop(slot);
    };
    tokio::spawn(task.instrument(span));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::fetch::FetchOutcome;
    use crate::source::SourceKind;

    struct Instant42;

    #[async_trait]
    impl Fetcher for Instant42 {
        type Payload = u32;

        async fn fetch(&self, _endpoint: &Endpoint) -> FetchOutcome<u32> {
            Ok(42)
        }
    }

    struct Panicking;

    #[async_trait]
    impl Fetcher for Panicking {
        type Payload = u32;

        async fn fetch(&self, _endpoint: &Endpoint) -> FetchOutcome<u32> {
            panic!("boom")
        }
    }

    fn endpoint(name: &str) -> Endpoint {
        Endpoint {
            source: SourceId::new(name),
            kind: SourceKind::ViaCep,
            url: url::Url::parse("http://127.0.0.1:1/").unwrap(),
            timeout: Duration::from_millis(100),
        }
    }

    #[test]
    fn options_from_settings() {
        let options = RaceOptions::default();
        assert_eq!(options.global_timeout, Duration::from_millis(1000));
        assert!(options.cancel_losers);
        assert_eq!(options.all_failed, AllFailedPolicy::WaitForDeadline);
    }

    #[tokio::test]
    async fn single_fast_source_wins() {
        let result = race(Arc::new(Instant42), vec![endpoint("a")], &RaceOptions::default()).await;
        let (source, payload) = result.winner().unwrap();
        assert_eq!(source.as_str(), "a");
        assert_eq!(*payload, 42);
    }

    #[tokio::test]
    async fn panic_is_reported_as_failure() {
        let options = RaceOptions {
            all_failed: AllFailedPolicy::ShortCircuit,
            ..RaceOptions::default()
        };
        let result = race(Arc::new(Panicking), vec![endpoint("a")], &options).await;
        match result {
            RaceResult::AllFailed(failures) => {
                assert_eq!(failures.len(), 1);
                assert!(matches!(failures[0].error, FetchError::Aborted(_)));
            }
            other => panic!("expected AllFailed, got {}", other.label()),
        }
    }

    #[tokio::test]
    async fn no_endpoints_short_circuits_empty() {
        let options = RaceOptions {
            all_failed: AllFailedPolicy::ShortCircuit,
            ..RaceOptions::default()
        };
        let result = race(Arc::new(Instant42), Vec::new(), &options).await;
        assert!(matches!(result, RaceResult::AllFailed(ref f) if f.is_empty()));
    }

    #[tokio::test]
    async fn no_endpoints_waits_for_deadline() {
        let options = RaceOptions::new(Duration::from_millis(50));
        let started = Instant::now();
        let result = race(Arc::new(Instant42), Vec::new(), &options).await;
        assert!(matches!(result, RaceResult::TimedOut));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
