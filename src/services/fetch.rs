// src/services/fetch.rs
// DOCUMENTATION: Observable state container around one asynchronous fetch
// PURPOSE: Track pending/error/data for a remote operation so views can render it

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Message used when a failure carries no text of its own
pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch data.";

/// Failure captured from a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    /// Build an error, substituting the fallback for blank messages
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self {
                message: DEFAULT_FETCH_ERROR.to_string(),
            }
        } else {
            Self { message }
        }
    }

    pub fn from_display<E: fmt::Display>(err: &E) -> Self {
        Self::new(err.to_string())
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        if let Some(msg) = payload.downcast_ref::<&'static str>() {
            Self::new(*msg)
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            Self::new(msg.as_str())
        } else {
            Self::new("")
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Snapshot of a fetch
/// DOCUMENTATION: `pending` is true strictly while the current invocation is in flight.
/// `data` keeps the last successful value (or the initial one) when a later attempt fails.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub pending: bool,
    pub error: Option<FetchError>,
    pub data: T,
}

impl<T> FetchState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            pending: false,
            error: None,
            data: initial,
        }
    }
}

/// Runs an operation whenever its dependency key changes and publishes the result
/// DOCUMENTATION: State lives in a `watch` channel so any number of views can
/// observe it. Every invocation gets a generation number; only the most recently
/// started invocation is allowed to settle the state, older ones are dropped on arrival.
/// There is no retry, cancellation or timeout: the operation decides when it completes.
pub struct Fetcher<K, T> {
    state: Arc<watch::Sender<FetchState<T>>>,
    generation: Arc<AtomicU64>,
    key: Option<K>,
}

impl<K, T> Fetcher<K, T>
where
    K: PartialEq,
    T: Clone + Send + Sync + 'static,
{
    /// Create an idle fetcher holding `initial` as its data
    pub fn new(initial: T) -> Self {
        let (state, _) = watch::channel(FetchState::new(initial));
        Self {
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            key: None,
        }
    }

    /// Start `operation` unless `key` equals the key of the last invocation
    /// DOCUMENTATION: Must be called from inside a Tokio runtime.
    /// `pending` is already true when this returns. Failures and panics of the
    /// operation end up in `error`; nothing is returned to the caller.
    ///
    /// # Returns
    /// true if the operation was started, false if the key was unchanged
    pub fn use_fetch<F, Fut, E>(&mut self, key: K, operation: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.key = Some(key);

        let mut generation = 0;
        self.state.send_modify(|s| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            s.pending = true;
        });

        // A panic while building the future settles this invocation instead of unwinding
        let future = match panic::catch_unwind(AssertUnwindSafe(operation)) {
            Ok(future) => future,
            Err(payload) => {
                settle(
                    &self.state,
                    &self.generation,
                    generation,
                    Err(FetchError::from_panic(payload)),
                );
                return true;
            }
        };
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        tokio::spawn(async move {
            // Run the operation in its own task so a panic is observed as a JoinError
            let outcome = match tokio::spawn(future).await {
                Ok(Ok(data)) => Ok(data),
                Ok(Err(err)) => Err(FetchError::from_display(&err)),
                Err(join_err) if join_err.is_panic() => {
                    Err(FetchError::from_panic(join_err.into_panic()))
                }
                Err(join_err) => Err(FetchError::from_display(&join_err)),
            };
            settle(&state, &current, generation, outcome);
        });

        true
    }

    /// Current snapshot
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Wait until no invocation is in flight and return that state
    pub async fn settled(&self) -> FetchState<T> {
        let mut rx = self.state.subscribe();
        let settled = match rx.wait_for(|s| !s.pending).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Key of the most recent invocation
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Number of invocations started so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Replace the data without running the operation (optimistic updates)
    pub fn set_data(&self, data: T) {
        self.state.send_modify(|s| s.data = data);
    }

    pub fn set_error(&self, error: Option<FetchError>) {
        self.state.send_modify(|s| s.error = error);
    }

    pub fn set_pending(&self, pending: bool) {
        self.state.send_modify(|s| s.pending = pending);
    }
}

/// Write the terminal state if `generation` is still the latest invocation
fn settle<T>(
    state: &watch::Sender<FetchState<T>>,
    current: &AtomicU64,
    generation: u64,
    outcome: Result<T, FetchError>,
) -> bool {
    state.send_if_modified(|s| {
        let latest = current.load(Ordering::SeqCst);
        if latest != generation {
            log::debug!(
                "Discarding settlement of fetch #{} (latest is #{})",
                generation,
                latest
            );
            return false;
        }
        s.pending = false;
        match outcome {
            Ok(data) => {
                s.data = data;
                s.error = None;
            }
            Err(err) => s.error = Some(err),
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PlacesError;
    use crate::models::{Place, PlaceImage};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready};

    fn place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            title: id.to_string(),
            image: PlaceImage {
                src: String::new(),
                alt: String::new(),
            },
            lat: 0.0,
            lon: 0.0,
        }
    }

    /// Failure whose Display output is empty
    struct Opaque;

    impl fmt::Display for Opaque {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    fn explode() -> Result<u32, String> {
        panic!("kaboom")
    }

    #[test]
    fn test_initial_state_is_idle() {
        let fetcher: Fetcher<u32, Vec<Place>> = Fetcher::new(Vec::new());
        assert_eq!(fetcher.state(), FetchState::new(Vec::new()));
        assert!(fetcher.key().is_none());
        assert_eq!(fetcher.generation(), 0);
    }

    #[tokio::test]
    async fn test_resolving_operation_sets_data() {
        let mut fetcher = Fetcher::new(Vec::new());

        let started = fetcher.use_fetch(1, || async {
            Ok::<_, PlacesError>(vec![place("p1")])
        });
        assert!(started);
        assert!(fetcher.is_pending());

        let state = fetcher.settled().await;
        assert_eq!(
            state,
            FetchState {
                pending: false,
                error: None,
                data: vec![place("p1")],
            }
        );
    }

    #[tokio::test]
    async fn test_rejecting_operation_keeps_initial_data() {
        let mut fetcher = Fetcher::new(vec![place("seed")]);

        fetcher.use_fetch("listing", || async {
            Err::<Vec<Place>, _>("boom".to_string())
        });

        let state = fetcher.settled().await;
        assert!(!state.pending);
        assert_eq!(state.error, Some(FetchError::new("boom")));
        assert_eq!(state.data, vec![place("seed")]);
    }

    #[tokio::test]
    async fn test_message_less_failure_uses_fallback() {
        let mut fetcher = Fetcher::new(0u32);
        fetcher.use_fetch(1, || async { Err::<u32, _>(Opaque) });

        let state = fetcher.settled().await;
        assert_eq!(state.error.unwrap().message, DEFAULT_FETCH_ERROR);
        assert_eq!(state.data, 0);
    }

    #[tokio::test]
    async fn test_remote_status_message_is_kept() {
        let mut fetcher = Fetcher::new(Vec::<Place>::new());
        fetcher.use_fetch(1, || async {
            Err::<Vec<Place>, _>(PlacesError::RemoteStatus {
                status: 500,
                message: "Failed to fetch places".to_string(),
            })
        });

        let state = fetcher.settled().await;
        assert_eq!(state.error.unwrap().message, "Failed to fetch places");
    }

    #[tokio::test]
    async fn test_panicking_operation_is_captured() {
        let mut fetcher = Fetcher::new(7u32);
        fetcher.use_fetch(1, || async { explode() });

        let state = fetcher.settled().await;
        assert!(!state.pending);
        assert_eq!(state.error.unwrap().message, "kaboom");
        assert_eq!(state.data, 7);
    }

    #[tokio::test]
    async fn test_panic_while_building_future_is_captured() {
        let mut fetcher = Fetcher::new(7u32);

        let started = fetcher.use_fetch(1, || -> std::future::Ready<Result<u32, String>> {
            panic!("sync boom")
        });
        assert!(started);

        let state = fetcher.state();
        assert!(!state.pending);
        assert_eq!(state.error, Some(FetchError::new("sync boom")));
        assert_eq!(state.data, 7);
        assert_eq!(fetcher.settled().await, state);

        // A new key runs again and clears the error
        fetcher.use_fetch(2, || async { Ok::<_, String>(8) });
        let state = fetcher.settled().await;
        assert_eq!(state.data, 8);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_pending_is_set_before_settlement() {
        let mut fetcher = Fetcher::new(0u32);
        let (tx, rx) = oneshot::channel::<u32>();

        fetcher.use_fetch(1, move || async move { rx.await.map_err(|e| e.to_string()) });
        assert!(fetcher.is_pending());

        let mut settled = tokio_test::task::spawn(fetcher.settled());
        assert_pending!(settled.poll());

        tx.send(42).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = assert_ready!(settled.poll());
        assert_eq!(state.data, 42);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_same_key_does_not_rerun() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut fetcher = Fetcher::new(0usize);

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            fetcher.use_fetch("places", move || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok::<_, String>(n) }
            });
        }

        let state = fetcher.settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.data, 1);
        assert_eq!(fetcher.generation(), 1);
    }

    #[tokio::test]
    async fn test_new_key_reruns_and_failure_retains_data() {
        let mut fetcher = Fetcher::new(String::new());

        fetcher.use_fetch(1, || async { Ok::<_, String>("first".to_string()) });
        assert_eq!(fetcher.settled().await.data, "first");

        fetcher.use_fetch(2, || async { Err::<String, _>("offline".to_string()) });
        let state = fetcher.settled().await;
        assert_eq!(state.data, "first");
        assert_eq!(state.error, Some(FetchError::new("offline")));

        fetcher.use_fetch(3, || async { Ok::<_, String>("third".to_string()) });
        let state = fetcher.settled().await;
        assert_eq!(state.data, "third");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_settlement_is_discarded() {
        let mut fetcher = Fetcher::new("initial");
        let (old_tx, old_rx) = oneshot::channel::<&'static str>();
        let (new_tx, new_rx) = oneshot::channel::<&'static str>();

        fetcher.use_fetch(1, move || async move { old_rx.await.map_err(|e| e.to_string()) });
        fetcher.use_fetch(2, move || async move { new_rx.await.map_err(|e| e.to_string()) });

        new_tx.send("newer").unwrap();
        let state = fetcher.settled().await;
        assert_eq!(state.data, "newer");

        old_tx.send("older").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = fetcher.state();
        assert_eq!(state.data, "newer");
        assert!(!state.pending);
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let mut fetcher = Fetcher::new(0u32);
        let (old_tx, old_rx) = oneshot::channel::<Result<u32, String>>();

        fetcher.use_fetch(1, move || async move {
            match old_rx.await {
                Ok(outcome) => outcome,
                Err(e) => Err(e.to_string()),
            }
        });
        fetcher.use_fetch(2, || async { Ok::<_, String>(2) });

        let state = fetcher.settled().await;
        assert_eq!(state.data, 2);

        old_tx.send(Err("late failure".to_string())).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let state = fetcher.state();
        assert!(!state.pending);
        assert!(state.error.is_none());
        assert_eq!(state.data, 2);
    }

    #[tokio::test]
    async fn test_stale_settlement_does_not_clear_pending() {
        let mut fetcher = Fetcher::new(0u32);
        let (old_tx, old_rx) = oneshot::channel::<u32>();
        let (new_tx, new_rx) = oneshot::channel::<u32>();

        fetcher.use_fetch(1, move || async move { old_rx.await.map_err(|e| e.to_string()) });
        fetcher.use_fetch(2, move || async move { new_rx.await.map_err(|e| e.to_string()) });

        old_tx.send(1).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fetcher.is_pending());
        assert_eq!(fetcher.state().data, 0);

        new_tx.send(2).unwrap();
        assert_eq!(fetcher.settled().await.data, 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let mut fetcher = Fetcher::new(0u32);
        let mut rx = fetcher.subscribe();

        fetcher.use_fetch(1, || async { Ok::<_, String>(5) });
        assert!(rx.borrow_and_update().pending);

        let state = rx.wait_for(|s| !s.pending).await.unwrap().clone();
        assert_eq!(state.data, 5);
    }

    #[test]
    fn test_manual_setters() {
        let fetcher: Fetcher<u32, u32> = Fetcher::new(1);

        fetcher.set_data(2);
        fetcher.set_error(Some(FetchError::new("")));
        fetcher.set_pending(true);

        let state = fetcher.state();
        assert_eq!(state.data, 2);
        assert!(state.pending);
        assert_eq!(state.error.unwrap().message, DEFAULT_FETCH_ERROR);
    }
}
