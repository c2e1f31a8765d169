//! Shared helpers for chat-peer integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_core::Notice;
use chat_peer::application::ChatDisplay;
use chat_peer::infrastructure::network::{active_dial, PeerConnection, PeerListener};

/// How long [`RecordingDisplay::wait_for`] polls before giving up.
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Display double that keeps every notice in order.
#[derive(Default)]
pub struct RecordingDisplay {
    shown: Mutex<Vec<Notice>>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.shown.lock().unwrap().clone()
    }

    /// Polls until a notice matching `pred` has been shown and returns it.
    ///
    /// Panics after [`WAIT_TIMEOUT`].
    pub async fn wait_for<F>(&self, pred: F) -> Notice
    where
        F: Fn(&Notice) -> bool,
    {
        let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
        loop {
            if let Some(found) = self.notices().into_iter().find(|n| pred(n)) {
                return found;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("timed out waiting for notice; shown so far: {:?}", self.notices());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl ChatDisplay for RecordingDisplay {
    fn show(&self, notice: &Notice) {
        self.shown.lock().unwrap().push(notice.clone());
    }
}

/// Connects two peers over loopback TCP.
///
/// Returns `(listener_side, dialer_side)`.
pub async fn connected_pair() -> (PeerConnection, PeerConnection) {
    let listener = PeerListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accept = tokio::spawn(listener.accept_one());

    let display = RecordingDisplay::new();
    let dialer = active_dial(&addr.to_string(), display.as_ref()).await.unwrap();
    let accepted = accept.await.unwrap().unwrap();

    (accepted, dialer)
}
