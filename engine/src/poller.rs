//! Background ticket polling.
//!
//! A single tokio task owns the [`TicketSource`] and fetches once immediately,
//! then on every interval tick. Results flow back to the render loop over a
//! bounded channel that the UI drains once per frame, so the UI thread never
//! awaits the network.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use ticketwall_client::{FetchError, TicketClient};
use ticketwall_types::Ticket;

/// Bounded: at most a handful of polls can be pending behind a stalled frame.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// `tokio::time::interval` panics on a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The polling task has ended and no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("poller stopped")]
pub struct PollerStopped;

/// Anything that can produce the current ticket list.
pub trait TicketSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Ticket>, FetchError>> + Send;
}

impl TicketSource for TicketClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Ticket>, FetchError>> + Send {
        self.fetch_tickets()
    }
}

#[derive(Debug, Clone)]
pub enum PollEvent {
    Updated {
        tickets: Vec<Ticket>,
        at: DateTime<Local>,
    },
    Failed {
        error: String,
        at: DateTime<Local>,
    },
}

/// Handle to the polling task. Dropping it stops the task.
#[derive(Debug)]
pub struct Poller {
    events: mpsc::Receiver<PollEvent>,
    refresh: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling task on the current tokio runtime.
    ///
    /// Intervals shorter than 10ms are raised to 10ms.
    pub fn spawn<S: TicketSource>(source: S, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (event_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        // Capacity 1: repeated refresh presses while a fetch is in flight coalesce.
        let (refresh, refresh_rx) = mpsc::channel(1);
        let task = tokio::spawn(poll_loop(source, interval, event_tx, refresh_rx));
        Self {
            events,
            refresh,
            task: Some(task),
        }
    }

    /// Next pending event, if any. Never blocks.
    ///
    /// Events already queued are still returned after the task ends; once they
    /// are drained this reports [`PollerStopped`].
    pub fn try_next(&mut self) -> Result<Option<PollEvent>, PollerStopped> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(PollerStopped),
        }
    }

    /// Wait for the next event; `None` once the task has stopped.
    pub async fn next(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }

    /// Ask for an immediate out-of-band fetch.
    pub fn refresh(&self) {
        // Full means a refresh is already queued.
        let _ = self.refresh.try_send(());
    }

    pub async fn shutdown(&mut self) {
        self.events.close();
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop<S: TicketSource>(
    source: S,
    interval: Duration,
    events: mpsc::Sender<PollEvent>,
    mut refresh: mpsc::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            requested = refresh.recv() => {
                if requested.is_none() {
                    break;
                }
                tracing::debug!("Manual refresh requested");
                ticker.reset();
            }
        }

        let event = match source.fetch().await {
            Ok(tickets) => {
                tracing::debug!(count = tickets.len(), "Poll succeeded");
                PollEvent::Updated {
                    tickets,
                    at: Local::now(),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Poll failed");
                PollEvent::Failed {
                    error: err.to_string(),
                    at: Local::now(),
                }
            }
        };

        if events.send(event).await.is_err() {
            break;
        }
    }

    tracing::debug!("Poller stopped");
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use ticketwall_client::StatusCode;

    /// Replays scripted results, then keeps returning empty lists.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<Vec<Ticket>, FetchError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Vec<Ticket>, FetchError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    script: Mutex::new(script.into()),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl TicketSource for ScriptedSource {
        fn fetch(&self) -> impl Future<Output = Result<Vec<Ticket>, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()));
            async move { next }
        }
    }

    fn open_ticket(protocol: &str) -> Ticket {
        Ticket::new(protocol, "subject").with_situation(1, None)
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_on_interval() {
        let (source, calls) = ScriptedSource::new(vec![
            Ok(vec![open_ticket("1")]),
            Ok(vec![open_ticket("1"), open_ticket("2")]),
        ]);
        let mut poller = Poller::spawn(source, Duration::from_secs(5));

        match poller.next().await {
            Some(PollEvent::Updated { tickets, .. }) => assert_eq!(tickets.len(), 1),
            other => panic!("expected first update, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        match poller.next().await {
            Some(PollEvent::Updated { tickets, .. }) => assert_eq!(tickets.len(), 2),
            other => panic!("expected second update, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported_and_polling_continues() {
        let (source, _calls) = ScriptedSource::new(vec![
            Err(FetchError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "gateway".to_string(),
            }),
            Ok(vec![open_ticket("7")]),
        ]);
        let mut poller = Poller::spawn(source, Duration::from_secs(5));

        match poller.next().await {
            Some(PollEvent::Failed { error, .. }) => assert!(error.contains("502")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(
            poller.next().await,
            Some(PollEvent::Updated { .. })
        ));

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_fetches_before_next_tick() {
        let (source, calls) = ScriptedSource::new(Vec::new());
        let mut poller = Poller::spawn(source, Duration::from_secs(3600));

        assert!(poller.next().await.is_some());
        poller.refresh();
        assert!(poller.next().await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poller.shutdown().await;
    }

    /// Panics on every fetch, ending the task.
    pub(crate) struct PanickingSource;

    async fn explode() -> Result<Vec<Ticket>, FetchError> {
        panic!("source blew up")
    }

    impl TicketSource for PanickingSource {
        fn fetch(&self) -> impl Future<Output = Result<Vec<Ticket>, FetchError>> + Send {
            explode()
        }
    }

    #[tokio::test]
    async fn try_next_is_empty_before_any_poll_lands() {
        let (source, _calls) = ScriptedSource::new(Vec::new());
        let mut poller = Poller::spawn(source, Duration::from_secs(3600));
        // The task has not had a chance to run on this single-threaded runtime yet.
        assert_eq!(poller.try_next().map(|e| e.is_none()), Ok(true));
        poller.shutdown().await;
        assert_eq!(poller.try_next().map(|_| ()), Err(PollerStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn crashed_task_reports_stopped() {
        let mut poller = Poller::spawn(PanickingSource, Duration::from_secs(5));
        let task = poller.task.take().unwrap();
        assert!(task.await.unwrap_err().is_panic());

        assert_eq!(poller.try_next().map(|_| ()), Err(PollerStopped));
        assert!(poller.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_events_drain_before_stopped() {
        let (source, _calls) = ScriptedSource::new(vec![Ok(vec![open_ticket("1")])]);
        let mut poller = Poller::spawn(source, Duration::from_secs(3600));
        assert!(poller.next().await.is_some());
        poller.refresh();
        tokio::time::sleep(Duration::from_millis(1)).await;

        if let Some(task) = poller.task.take() {
            task.abort();
            let _ = task.await;
        }
        assert!(matches!(poller.try_next(), Ok(Some(PollEvent::Updated { .. }))));
        assert_eq!(poller.try_next().map(|_| ()), Err(PollerStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped() {
        let (source, calls) = ScriptedSource::new(Vec::new());
        let mut poller = Poller::spawn(source, Duration::ZERO);

        assert!(poller.next().await.is_some());
        assert!(poller.next().await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poller.shutdown().await;
    }
}
