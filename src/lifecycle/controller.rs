//! Probe loop state machine.
//!
//! # States
//! ```text
//! Connecting → Probing → Recording → Waiting → Connecting ...
//!                            │           │
//!                 append fails      signal received
//!                            ▼           ▼
//!                          Stopping ──→ Stopped
//! ```
//!
//! `Init → Connecting` happens in [`startup`](crate::lifecycle::startup) once
//! configuration is resolved and the output log is open.
//!
//! # Design Decisions
//! - Exactly one tick runs at a time; a signal is only observed while waiting
//! - A signal that is ready together with the interval timer wins
//! - A tick in progress always finishes its probe and its append

use std::time::Duration;

use tokio::time;

use crate::error::ProberError;
use crate::health::{Outcome, Prober};
use crate::lifecycle::shutdown::ShutdownListener;
use crate::lifecycle::signals::Signal;
use crate::net::{ConnectStrategy, ConnectionManager, Connector};
use crate::recorder::{RecordError, RecordSink};

/// Result of a run ended by a termination signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Signal that ended the run.
    pub signal: Signal,
    /// Completed ticks, equal to the records appended.
    pub ticks: u64,
}

#[derive(Debug)]
enum State {
    Connecting,
    Probing,
    Recording(Outcome),
    Waiting,
    Stopping(StopReason),
    Stopped(Result<RunSummary, ProberError>),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Connecting => "connecting",
            State::Probing => "probing",
            State::Recording(_) => "recording",
            State::Waiting => "waiting",
            State::Stopping(_) => "stopping",
            State::Stopped(_) => "stopped",
        }
    }
}

#[derive(Debug)]
enum StopReason {
    Signal(Signal),
    Fatal(RecordError),
}

/// Drives connect → probe → record → wait until a signal or a fatal error.
pub struct Controller<C: Connector, S: RecordSink> {
    connections: ConnectionManager<C>,
    strategy: ConnectStrategy,
    prober: Prober,
    sink: S,
    interval: Duration,
    ticks: u64,
}

impl<C: Connector, S: RecordSink> Controller<C, S> {
    pub fn new(
        connector: C,
        strategy: ConnectStrategy,
        prober: Prober,
        sink: S,
        interval: Duration,
    ) -> Self {
        Self {
            connections: ConnectionManager::new(connector),
            strategy,
            prober,
            sink,
            interval,
            ticks: 0,
        }
    }

    /// Connection handles opened so far.
    pub fn connections_opened(&self) -> u64 {
        self.connections.opened()
    }

    /// Run until `shutdown` yields a signal (`Ok`) or a record cannot be
    /// made durable (`Err`). The live connection is closed either way.
    pub async fn run(&mut self, mut shutdown: ShutdownListener) -> Result<RunSummary, ProberError> {
        let mut state = State::Connecting;

        loop {
            state = match state {
                State::Stopped(result) => return result,
                state => {
                    let from = state.name();
                    let next = self.step(state, &mut shutdown).await;
                    tracing::trace!(from, to = next.name(), "State transition");
                    next
                }
            };
        }
    }

    async fn step(&mut self, state: State, shutdown: &mut ShutdownListener) -> State {
        match state {
            State::Connecting => {
                self.connections.ensure_connection(self.strategy).await;
                State::Probing
            }

            State::Probing => match self.connections.current() {
                Some(conn) => State::Recording(self.prober.probe(conn).await),
                None => State::Connecting,
            },

            State::Recording(outcome) => match self.sink.append(&outcome).await {
                Ok(()) => {
                    self.ticks += 1;
                    tracing::debug!(
                        tick = self.ticks,
                        error = outcome.error,
                        duration_micro = outcome.duration_micro,
                        "Tick recorded"
                    );
                    State::Waiting
                }
                Err(e) => State::Stopping(StopReason::Fatal(e)),
            },

            State::Waiting => {
                tokio::select! {
                    biased;
                    signal = shutdown.recv() => State::Stopping(StopReason::Signal(signal)),
                    _ = time::sleep(self.interval) => State::Connecting,
                }
            }

            State::Stopping(reason) => {
                self.connections.release().await;
                match reason {
                    StopReason::Signal(signal) => {
                        tracing::info!(signal = %signal, ticks = self.ticks, "Received signal, stopping");
                        State::Stopped(Ok(RunSummary {
                            signal,
                            ticks: self.ticks,
                        }))
                    }
                    StopReason::Fatal(e) => {
                        tracing::error!(error = %e, ticks = self.ticks, "Cannot record outcome, stopping");
                        State::Stopped(Err(ProberError::Record(e)))
                    }
                }
            }

            State::Stopped(result) => State::Stopped(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::shutdown;
    use crate::net::{Connection, ProbeError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeConnector {
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        unreachable: Arc<AtomicBool>,
        latency: Option<Duration>,
    }

    struct FakeConnection {
        serial: usize,
        connector: FakeConnector,
    }

    impl Connector for FakeConnector {
        type Connection = FakeConnection;

        fn open(&self) -> FakeConnection {
            let serial = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
            FakeConnection {
                serial,
                connector: self.clone(),
            }
        }
    }

    impl Connection for FakeConnection {
        async fn ping(&self) -> Result<(), ProbeError> {
            if let Some(latency) = self.connector.latency {
                time::sleep(latency).await;
            }
            if self.connector.unreachable.load(Ordering::SeqCst) {
                Err(ProbeError::Protocol(format!("handle {} unreachable", self.serial)))
            } else {
                Ok(())
            }
        }

        async fn close(self) -> Result<(), ProbeError> {
            self.connector.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemorySink {
        records: Arc<Mutex<Vec<Outcome>>>,
        fail_after: Option<usize>,
    }

    impl RecordSink for MemorySink {
        async fn append(&mut self, outcome: &Outcome) -> Result<(), RecordError> {
            let mut records = self.records.lock().unwrap();
            if self.fail_after.is_some_and(|limit| records.len() >= limit) {
                return Err(RecordError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "no space left on device",
                )));
            }
            records.push(outcome.clone());
            Ok(())
        }
    }

    fn controller(
        strategy: ConnectStrategy,
        connector: FakeConnector,
        sink: MemorySink,
    ) -> Controller<FakeConnector, MemorySink> {
        Controller::new(
            connector,
            strategy,
            Prober::new("cache:6379", Duration::from_secs(3)),
            sink,
            Duration::from_millis(100),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_run_records_every_tick() {
        let connector = FakeConnector::default();
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Persistent, connector.clone(), sink.clone());
        let (trigger, listener) = shutdown::channel();

        let run = tokio::spawn(async move {
            let summary = controller.run(listener).await;
            (summary, controller.connections_opened())
        });
        time::sleep(Duration::from_millis(350)).await;
        trigger.trigger(Signal::Terminate);

        let (summary, opened) = run.await.unwrap();
        let summary = summary.unwrap();
        let records = sink.records.lock().unwrap();

        assert_eq!(summary.signal, Signal::Terminate);
        assert!(summary.ticks >= 3);
        assert_eq!(records.len() as u64, summary.ticks);
        assert!(records.iter().all(|r| !r.error && r.target == "cache:6379"));
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(opened, 1);
        // released on shutdown
        assert_eq!(connector.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_opens_handle_per_tick() {
        let connector = FakeConnector::default();
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Reconnect, connector.clone(), sink.clone());
        let (trigger, listener) = shutdown::channel();

        let run = tokio::spawn(async move { controller.run(listener).await });
        time::sleep(Duration::from_millis(350)).await;
        trigger.trigger(Signal::Interrupt);

        let summary = run.await.unwrap().unwrap();
        let opened = connector.opened.load(Ordering::SeqCst) as u64;
        assert_eq!(opened, summary.ticks);
        assert_eq!(connector.closed.load(Ordering::SeqCst) as u64, summary.ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_target_keeps_running() {
        let connector = FakeConnector::default();
        connector.unreachable.store(true, Ordering::SeqCst);
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Persistent, connector.clone(), sink.clone());
        let (trigger, listener) = shutdown::channel();

        let run = tokio::spawn(async move { controller.run(listener).await });
        time::sleep(Duration::from_millis(550)).await;
        assert!(!run.is_finished());
        trigger.trigger(Signal::Terminate);

        let summary = run.await.unwrap().unwrap();
        let records = sink.records.lock().unwrap();
        assert!(summary.ticks >= 5);
        assert!(records.iter().all(|r| r.error && !r.message.is_empty()));
        // failed probes do not invalidate the handle
        assert_eq!(connector.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_signal_lets_current_tick_finish() {
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Persistent, FakeConnector::default(), sink.clone());
        let (trigger, listener) = shutdown::channel();
        trigger.trigger(Signal::Interrupt);

        let summary = controller.run(listener).await.unwrap();
        assert_eq!(summary, RunSummary { signal: Signal::Interrupt, ticks: 1 });
        assert_eq!(sink.records.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_during_probe_waits_for_record() {
        let connector = FakeConnector {
            latency: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Persistent, connector, sink.clone());
        let (trigger, listener) = shutdown::channel();

        let run = tokio::spawn(async move { controller.run(listener).await });
        time::sleep(Duration::from_millis(500)).await;
        assert!(sink.records.lock().unwrap().is_empty());
        trigger.trigger(Signal::Terminate);

        let summary = run.await.unwrap().unwrap();
        assert_eq!(summary, RunSummary { signal: Signal::Terminate, ticks: 1 });
        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].error);
        assert!(records[0].duration_micro >= 1_000_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signal_wins_tie_with_timer() {
        let sink = MemorySink::default();
        let mut controller = controller(ConnectStrategy::Persistent, FakeConnector::default(), sink.clone());
        let (trigger, listener) = shutdown::channel();

        let run = tokio::spawn(async move { controller.run(listener).await });
        // Let the first tick finish, then advance exactly to the timer deadline
        // with the signal already queued.
        tokio::task::yield_now().await;
        trigger.trigger(Signal::Terminate);
        time::advance(Duration::from_millis(100)).await;

        let summary = run.await.unwrap().unwrap();
        assert_eq!(summary.ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_append_failure_is_fatal() {
        let connector = FakeConnector::default();
        let sink = MemorySink {
            fail_after: Some(2),
            ..Default::default()
        };
        let mut controller = controller(ConnectStrategy::Persistent, connector.clone(), sink.clone());
        let (_trigger, listener) = shutdown::channel();

        let err = controller.run(listener).await.unwrap_err();
        assert!(matches!(err, ProberError::Record(RecordError::Io(_))));
        assert_eq!(sink.records.lock().unwrap().len(), 2);
        assert_eq!(connector.closed.load(Ordering::SeqCst), 1);
    }
}
