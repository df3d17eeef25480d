// Polling telemetry view - owns the view state and the poll timer
use crate::application::telemetry_source::TelemetrySource;
use crate::domain::view_state::ViewState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    /// Upper bound on retained predictions; `None` keeps every batch.
    pub max_predictions: Option<usize>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_predictions: None,
        }
    }
}

/// A mounted dashboard view.
///
/// Mounting fetches history and predictions right away and then again on
/// every tick of the poll interval. Each state change is published to
/// subscribers. Unmounting (or dropping) stops the timer, and no result that
/// arrives afterwards is applied.
pub struct PollingTelemetryView {
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
}

impl PollingTelemetryView {
    pub fn mount(source: Arc<dyn TelemetrySource>, settings: PollSettings) -> Self {
        let (tx, _) = watch::channel(ViewState::default());
        let state = Arc::new(tx);
        let cancel = CancellationToken::new();

        tracing::info!(
            interval_ms = settings.interval.as_millis() as u64,
            max_predictions = ?settings.max_predictions,
            "Mounting telemetry view"
        );
        tokio::spawn(poll_loop(source, settings, state.clone(), cancel.clone()));

        Self { state, cancel }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Resolves once the view is unmounted.
    pub fn unmounted(&self) -> impl Future<Output = ()> + Send + 'static + use<> {
        self.cancel.clone().cancelled_owned()
    }

    pub fn unmount(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        // Cancel under the state lock so an apply that is already running
        // finishes first and every later one sees the token.
        self.state.send_if_modified(|_| {
            self.cancel.cancel();
            false
        });
        tracing::info!("Telemetry view unmounted");
    }
}

impl Drop for PollingTelemetryView {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn poll_loop(
    source: Arc<dyn TelemetrySource>,
    settings: PollSettings,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
) {
    // The first tick completes immediately, which gives the mount-time fetch
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tracing::debug!("Polling telemetry endpoints");
                tokio::spawn(refresh_history(source.clone(), state.clone(), cancel.clone()));
                tokio::spawn(refresh_predictions(
                    source.clone(),
                    state.clone(),
                    cancel.clone(),
                    settings.max_predictions,
                ));
            }
        }
    }

    tracing::debug!("Poll loop stopped");
}

async fn refresh_history(
    source: Arc<dyn TelemetrySource>,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
) {
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = source.fetch_history() => result,
    };

    let applied = match result {
        Ok(readings) => {
            tracing::debug!("Received {} readings", readings.len());
            apply(&state, &cancel, move |view| view.replace_history(readings))
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), "Error fetching temperature data: {}", e);
            apply(&state, &cancel, ViewState::history_failed)
        }
    };

    if !applied && cancel.is_cancelled() {
        tracing::warn!("Discarded history result that arrived after unmount");
    }
}

async fn refresh_predictions(
    source: Arc<dyn TelemetrySource>,
    state: Arc<watch::Sender<ViewState>>,
    cancel: CancellationToken,
    max_predictions: Option<usize>,
) {
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        result = source.fetch_predictions() => result,
    };

    match result {
        Ok(predictions) => {
            tracing::debug!("Received {} predictions", predictions.len());
            let applied = apply(&state, &cancel, move |view| {
                view.append_predictions(predictions, max_predictions)
            });
            if !applied {
                tracing::warn!("Discarded prediction result that arrived after unmount");
            }
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), "Error fetching prediction data: {}", e);
        }
    }
}

/// Runs `update` under the state lock unless the view has been unmounted.
/// Subscribers are notified only when `update` reports a change.
fn apply<F>(state: &watch::Sender<ViewState>, cancel: &CancellationToken, update: F) -> bool
where
    F: FnOnce(&mut ViewState) -> bool,
{
    state.send_if_modified(|view| {
        if cancel.is_cancelled() {
            return false;
        }
        update(view)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::{Prediction, Reading};
    use crate::infrastructure::error::FetchError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const LONG: Duration = Duration::from_secs(3600);
    const SHORT: Duration = Duration::from_millis(20);

    fn reading(secs: i64, cpu: f64, battery: f64) -> Reading {
        Reading::new(Utc.timestamp_opt(secs, 0).unwrap(), cpu, battery)
    }

    fn prediction(secs: i64, cpu: f64, battery: f64) -> Prediction {
        Prediction::new(Utc.timestamp_opt(secs, 0).unwrap(), cpu, battery)
    }

    fn server_error() -> FetchError {
        FetchError::Http {
            url: "http://test/".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    type Script<T> = Mutex<VecDeque<Result<Vec<T>, FetchError>>>;

    /// Answers from a queue; once empty every call fails.
    struct ScriptedSource {
        history: Script<Reading>,
        predictions: Script<Prediction>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(
            history: Vec<Result<Vec<Reading>, FetchError>>,
            predictions: Vec<Result<Vec<Prediction>, FetchError>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                history: Mutex::new(history.into()),
                predictions: Mutex::new(predictions.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TelemetrySource for ScriptedSource {
        async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.history.lock().unwrap().pop_front().unwrap_or_else(|| Err(server_error()))
        }

        async fn fetch_predictions(&self) -> Result<Vec<Prediction>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.predictions.lock().unwrap().pop_front().unwrap_or_else(|| Err(server_error()))
        }
    }

    /// History blocks until released; predictions answer with a fixed batch,
    /// or never resolve when there is none.
    struct GatedSource {
        requested: Notify,
        release: Notify,
        predictions: Option<Vec<Prediction>>,
    }

    impl GatedSource {
        fn new(predictions: Option<Vec<Prediction>>) -> Arc<Self> {
            Arc::new(Self {
                requested: Notify::new(),
                release: Notify::new(),
                predictions,
            })
        }
    }

    #[async_trait]
    impl TelemetrySource for GatedSource {
        async fn fetch_history(&self) -> Result<Vec<Reading>, FetchError> {
            self.requested.notify_one();
            self.release.notified().await;
            Ok(vec![reading(1, 10.0, 20.0)])
        }

        async fn fetch_predictions(&self) -> Result<Vec<Prediction>, FetchError> {
            match &self.predictions {
                Some(batch) => Ok(batch.clone()),
                None => std::future::pending().await,
            }
        }
    }

    fn settings(interval: Duration) -> PollSettings {
        PollSettings {
            interval,
            max_predictions: None,
        }
    }

    async fn wait_until<F>(view: &PollingTelemetryView, predicate: F) -> ViewState
    where
        F: FnMut(&ViewState) -> bool,
    {
        let mut rx = view.subscribe();
        let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
            .await
            .expect("view state never reached the expected shape")
            .expect("view state channel closed");
        state.clone()
    }

    #[tokio::test]
    async fn test_mount_fetches_both_resources_immediately() {
        let source = ScriptedSource::new(vec![Ok(Vec::new())], vec![Ok(Vec::new())]);
        let view = PollingTelemetryView::mount(source.clone(), settings(LONG));

        assert!(view.is_mounted());
        let state = wait_until(&view, |s| !s.loading).await;
        assert!(state.history.is_empty());
        assert!(state.predictions.is_empty());

        tokio::time::sleep(SHORT).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_history_replaced_on_each_poll() {
        let source = ScriptedSource::new(
            vec![Ok(vec![reading(1, 10.0, 20.0)]), Ok(vec![reading(2, 11.0, 21.0)])],
            Vec::new(),
        );
        let view = PollingTelemetryView::mount(source, settings(SHORT));

        let state = wait_until(&view, |s| s.history.first().map(|r| r.cpu_temp) == Some(11.0)).await;
        assert_eq!(state.history, vec![reading(2, 11.0, 21.0)]);

        // later failures leave the last snapshot in place
        tokio::time::sleep(SHORT * 3).await;
        assert_eq!(view.state().history, vec![reading(2, 11.0, 21.0)]);
        assert!(!view.state().loading);
    }

    #[tokio::test]
    async fn test_predictions_accumulate_across_polls() {
        let source = ScriptedSource::new(
            Vec::new(),
            vec![Ok(vec![prediction(1, 50.0, 40.0)]), Ok(vec![prediction(3, 51.0, 41.0)])],
        );
        let view = PollingTelemetryView::mount(source, settings(SHORT));

        let state = wait_until(&view, |s| s.predictions.len() == 2).await;
        assert_eq!(
            state.predictions,
            vec![prediction(1, 50.0, 40.0), prediction(3, 51.0, 41.0)]
        );
    }

    #[tokio::test]
    async fn test_prediction_limit_applies_while_polling() {
        let source = ScriptedSource::new(
            Vec::new(),
            vec![
                Ok(vec![prediction(1, 1.0, 1.0), prediction(2, 2.0, 2.0)]),
                Ok(vec![prediction(3, 3.0, 3.0)]),
            ],
        );
        let view = PollingTelemetryView::mount(
            source,
            PollSettings {
                interval: SHORT,
                max_predictions: Some(2),
            },
        );

        let state = wait_until(&view, |s| s.predictions.last().map(|p| p.predicted_cpu_temp) == Some(3.0)).await;
        assert_eq!(state.predictions, vec![prediction(2, 2.0, 2.0), prediction(3, 3.0, 3.0)]);
    }

    #[tokio::test]
    async fn test_failed_history_still_clears_loading() {
        let source = ScriptedSource::new(vec![Err(server_error())], vec![Ok(Vec::new())]);
        let view = PollingTelemetryView::mount(source, settings(LONG));

        let state = wait_until(&view, |s| !s.loading).await;
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn test_failed_predictions_do_not_notify() {
        let source = ScriptedSource::new(vec![Ok(Vec::new())], vec![Err(server_error())]);
        let view = PollingTelemetryView::mount(source.clone(), settings(LONG));
        wait_until(&view, |s| !s.loading).await;

        let rx = view.subscribe();
        tokio::time::sleep(SHORT).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(!rx.has_changed().unwrap());
        assert!(view.state().predictions.is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_result_discarded_after_unmount() {
        let source = GatedSource::new(None);
        let view = PollingTelemetryView::mount(source.clone(), settings(LONG));
        let rx = view.subscribe();

        source.requested.notified().await;
        view.unmount();
        assert!(!view.is_mounted());

        source.release.notify_one();
        tokio::time::sleep(SHORT).await;

        assert_eq!(view.state(), ViewState::default());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_predictions_land_while_history_is_loading() {
        let source = GatedSource::new(Some(vec![prediction(5, 50.0, 40.0)]));
        let view = PollingTelemetryView::mount(source.clone(), settings(LONG));

        let state = wait_until(&view, |s| !s.predictions.is_empty()).await;
        assert!(state.loading);
        assert!(state.history.is_empty());
        assert_eq!(state.predictions, vec![prediction(5, 50.0, 40.0)]);

        view.unmount();
        source.release.notify_one();
        tokio::time::sleep(SHORT).await;

        let after = view.state();
        assert_eq!(after.predictions.len(), 1);
        assert!(after.loading);
        assert!(after.history.is_empty());
    }

    #[tokio::test]
    async fn test_unmount_stops_polling() {
        let source = ScriptedSource::new(Vec::new(), Vec::new());
        let view = PollingTelemetryView::mount(source.clone(), settings(Duration::from_millis(5)));
        wait_until(&view, |s| !s.loading).await;

        view.unmount();
        view.unmount();
        tokio::time::sleep(SHORT).await;
        let calls = source.calls.load(Ordering::SeqCst);

        tokio::time::sleep(SHORT * 3).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls);
    }

    #[test]
    fn test_apply_is_a_no_op_once_cancelled() {
        let (tx, rx) = watch::channel(ViewState::default());
        let cancel = CancellationToken::new();

        assert!(apply(&tx, &cancel, ViewState::history_failed));
        cancel.cancel();
        assert!(!apply(&tx, &cancel, |view| view.replace_history(vec![reading(1, 1.0, 1.0)])));

        assert!(rx.borrow().history.is_empty());
        assert!(!rx.borrow().loading);
    }
}
