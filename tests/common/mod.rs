#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use qrstudio::config::Config;
use qrstudio::preview::{PreviewFrame, PreviewSink};
use qrstudio::upload::SelectedFile;
use qrstudio::StudioError;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum SinkEvent {
    Frame(PreviewFrame),
    Failure(String),
}

/// Preview sink that records payload updates and forwards image/failure
/// events over a channel so tests can await them.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
    pub payloads: Mutex<Vec<String>>,
}

impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                tx,
                payloads: Mutex::new(Vec::new()),
            }),
            rx,
        )
    }
}

impl PreviewSink for ChannelSink {
    fn payload_changed(&self, payload: &str) {
        self.payloads.lock().unwrap().push(payload.to_owned());
    }

    fn image_ready(&self, frame: PreviewFrame) {
        let _ = self.tx.send(SinkEvent::Frame(frame));
    }

    fn preview_failed(&self, error: &StudioError) {
        let _ = self.tx.send(SinkEvent::Failure(error.to_string()));
    }
}

pub async fn recv_event(rx: &mut mpsc::UnboundedReceiver<SinkEvent>) -> SinkEvent {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for a preview event")
        .expect("preview pipeline dropped its sink")
}

/// Config pointed at a mock server, with a short debounce window so the
/// pipeline settles quickly under real time.
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.service.base_url = base_url.to_owned();
    config.preview.debounce_ms = 25;
    config
}

pub fn pdf_file(name: &str, size: usize) -> SelectedFile {
    SelectedFile::new(name, Some("application/pdf".into()), vec![0x25; size])
}

pub fn png_file(name: &str) -> SelectedFile {
    let bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
    SelectedFile::new(name, Some("image/png".into()), bytes)
}
