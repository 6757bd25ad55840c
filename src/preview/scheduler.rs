use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Result, StudioError};

use super::request::{FormSnapshot, PreviewFrame, RenderRequest};

/// Rendering collaborator seam. The production implementation is
/// `client::RenderClient`; tests drive the scheduler with fakes.
#[async_trait]
pub trait RenderPreview: Send + Sync {
    async fn render_preview(&self, request: &RenderRequest) -> Result<Vec<u8>>;
}

/// Where scheduler output lands: the textual payload preview (synchronous,
/// every call) and the rendered image (debounced, latest request only).
pub trait PreviewSink: Send + Sync {
    fn payload_changed(&self, payload: &str);
    fn image_ready(&self, frame: PreviewFrame);
    /// Non-cancellation failures only; superseded requests never reach here.
    fn preview_failed(&self, error: &StudioError);
}

/// Debounces form edits into preview requests and guarantees that only the
/// most recently issued request can update the displayed image.
///
/// All request state lives on the instance, so independent preview surfaces
/// can run their own schedulers side by side. Cloning shares the instance.
/// Must be used inside a tokio runtime.
#[derive(Clone)]
pub struct PreviewScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    renderer: Arc<dyn RenderPreview>,
    sink: Arc<dyn PreviewSink>,
    window: Duration,
    /// Monotonic request id; compared at apply time to drop stale responses.
    seq: AtomicU64,
    state: Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    /// Snapshot to dispatch when the quiet window elapses.
    pending: Option<FormSnapshot>,
    debounce: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
}

impl PreviewScheduler {
    /// Default quiet window for the image preview.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(150);

    pub fn new(
        renderer: Arc<dyn RenderPreview>,
        sink: Arc<dyn PreviewSink>,
        window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer,
                sink,
                window,
                seq: AtomicU64::new(0),
                state: Mutex::new(SchedulerState::default()),
            }),
        }
    }

    /// Record a form mutation. The composed payload is pushed to the sink
    /// immediately; the image request waits out the quiet window, and calls
    /// arriving within it collapse into a single dispatch built from the
    /// last snapshot seen.
    pub fn schedule(&self, snapshot: FormSnapshot) {
        self.inner.publish_payload(&snapshot);
        if let Ok(mut state) = self.inner.state.lock() {
            state.pending = Some(snapshot);
            if let Some(timer) = state.debounce.take() {
                timer.abort();
            }
            let inner = Arc::clone(&self.inner);
            state.debounce = Some(tokio::spawn(async move {
                tokio::time::sleep(inner.window).await;
                dispatch(&inner);
            }));
        }
    }

    /// Dispatch without waiting out the window (initial render, post-upload
    /// refresh). Still cancels any in-flight request first.
    pub fn refresh_now(&self, snapshot: FormSnapshot) {
        self.inner.publish_payload(&snapshot);
        if let Ok(mut state) = self.inner.state.lock() {
            state.pending = Some(snapshot);
            if let Some(timer) = state.debounce.take() {
                timer.abort();
            }
        }
        dispatch(&self.inner);
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.inner.window
    }
}

impl Inner {
    fn publish_payload(&self, snapshot: &FormSnapshot) {
        let payload = snapshot.selection.compose();
        self.sink.payload_changed(&payload);
    }
}

fn dispatch(inner: &Arc<Inner>) {
    let Ok(mut state) = inner.state.lock() else {
        return;
    };
    let Some(snapshot) = state.pending.take() else {
        return;
    };
    let request = snapshot.render_request();
    let transparent = snapshot.transparent;
    let id = inner.seq.fetch_add(1, Ordering::SeqCst) + 1;

    // Cancel the previous request before issuing the new one; a stale
    // response must never overwrite a newer image.
    if let Some(previous) = state.in_flight.take() {
        previous.abort();
        trace!(request_id = id, "superseded in-flight preview request");
    }

    let this = Arc::clone(inner);
    state.in_flight = Some(tokio::spawn(async move {
        debug!(
            request_id = id,
            payload_len = request.data.len(),
            "dispatching preview request"
        );
        match this.renderer.render_preview(&request).await {
            Ok(image) => {
                if this.seq.load(Ordering::SeqCst) == id {
                    this.sink.image_ready(PreviewFrame { image, transparent });
                } else {
                    trace!(request_id = id, "stale preview response dropped");
                }
            }
            Err(StudioError::Canceled) => {
                trace!(request_id = id, "preview request canceled");
            }
            Err(error) => {
                warn!(request_id = id, error = %error, "preview render failed");
                this.sink.preview_failed(&error);
            }
        }
    }));
}
