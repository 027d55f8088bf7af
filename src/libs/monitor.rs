//! Global keyboard and mouse listener feeding the engine's input queue.
//!
//! `rdev::listen` blocks its thread for the life of the process, so the
//! listener runs on a dedicated OS thread and restarts itself if the hook
//! fails. Key and button presses/releases qualify as input; wheel and pointer
//! motion do not.

use super::engine::InputSender;
use rdev::{listen, Event, EventType};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_secs(1);
pub const LISTENER_THREAD: &str = "devrhythm-input";

/// Runs `work` on a named OS thread; the spawn error is returned, not raised.
pub fn spawn_named<F>(name: &str, work: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(work)
}

/// Whether a raw device event counts as user input.
pub fn is_qualifying(event_type: &EventType) -> bool {
    matches!(
        event_type,
        EventType::KeyPress(_) | EventType::KeyRelease(_) | EventType::ButtonPress(_) | EventType::ButtonRelease(_)
    )
}

pub struct Monitor {
    sender: InputSender,
}

impl Monitor {
    pub fn new(sender: InputSender) -> Self {
        Self { sender }
    }

    /// Starts listening on a background thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        spawn_named(LISTENER_THREAD, move || self.run())
    }

    fn run(self) {
        loop {
            let sender = self.sender.clone();
            let result = listen(move |event: Event| {
                if is_qualifying(&event.event_type) && !sender.try_send() {
                    tracing::trace!("input queue full or closed, input dropped");
                }
            });

            match result {
                Ok(()) => break,
                Err(e) => {
                    tracing::warn!(error = ?e, "failed to listen for input events, retrying");
                    thread::sleep(RETRY_DELAY);
                }
            }
        }
    }
}
