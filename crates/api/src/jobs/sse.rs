use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use scrapedesk_core::jobs::event::{EventSink, JobEvent};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;

/// Tells nginx-style proxies not to buffer the stream.
pub const ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Event payload bytes allowed to wait for a slow client (16 MiB).
pub const MAX_QUEUED_BYTES: usize = 16 * 1024 * 1024;

/// Writes job events to one client as SSE `data:` frames.
///
/// The first failed send means the client is gone. A client more than
/// [`MAX_QUEUED_BYTES`] behind is treated the same way. Either is logged
/// once and every later event is dropped; the job itself keeps running.
#[derive(Debug)]
pub struct SseSink {
    tx: mpsc::UnboundedSender<(usize, Event)>,
    queued: Arc<AtomicUsize>,
    disconnected: bool,
}

impl SseSink {
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl EventSink for SseSink {
    fn emit(&mut self, event: JobEvent) {
        if self.disconnected {
            return;
        }

        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "sse event serialization failed");
                return;
            }
        };
        let size = payload.len();

        let queued = self.queued.load(Ordering::Relaxed);
        if queued + size > MAX_QUEUED_BYTES {
            warn!(queued, "sse client too slow, discarding further events");
            self.disconnected = true;
            return;
        }

        self.queued.fetch_add(size, Ordering::Relaxed);
        if self.tx.send((size, Event::default().data(payload))).is_err() {
            warn!(kind = ?event.kind, "sse client disconnected, discarding further events");
            self.disconnected = true;
        }
    }
}

fn event_stream() -> (impl Stream<Item = Result<Event, Infallible>>, SseSink) {
    let (tx, rx) = mpsc::unbounded_channel::<(usize, Event)>();
    let queued = Arc::new(AtomicUsize::new(0));

    let released = Arc::clone(&queued);
    let stream = UnboundedReceiverStream::new(rx).map(move |(size, event)| {
        released.fetch_sub(size, Ordering::Relaxed);
        Ok::<_, Infallible>(event)
    });

    (
        stream,
        SseSink {
            tx,
            queued,
            disconnected: false,
        },
    )
}

/// Open a progress stream: the response half goes back to the client, the
/// sink half goes to the job task. The stream ends when the sink is dropped.
pub fn progress_channel() -> (Response, SseSink) {
    let (stream, sink) = event_stream();
    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("ping"),
    );

    let response = ([(ACCEL_BUFFERING, "no")], sse).into_response();
    (response, sink)
}
