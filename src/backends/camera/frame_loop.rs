// SPDX-License-Identifier: GPL-3.0-only
//! Thread lifecycle for live feeds
//!
//! Every live feed (V4L2 or virtual) runs the same shape of loop on its own
//! thread: initialise a source, pull frames from it, push them into a
//! bounded channel without blocking. [`FeedLoop`] owns that thread.

use super::types::{CameraFrame, FrameSender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Result of one iteration of a frame source
#[derive(Debug)]
pub enum FeedStep {
    /// A frame is ready to be delivered
    Frame(CameraFrame),
    /// Nothing to deliver this time (transient error, pacing)
    Skip,
    /// The source is exhausted or broken
    Stop,
}

/// A live feed running on its own thread
///
/// Frames are sent with `try_send`: when the UI falls behind, new frames are
/// dropped instead of queueing. The loop ends when [`FeedLoop::stop`] is
/// called, the source returns [`FeedStep::Stop`], or the receiver is gone.
pub struct FeedLoop {
    name: String,
    stop_signal: Arc<AtomicBool>,
    frames_sent: Arc<AtomicU64>,
    frames_dropped: Arc<AtomicU64>,
    thread_handle: Option<JoinHandle<()>>,
}

impl FeedLoop {
    /// Spawn the feed thread
    ///
    /// `init` runs once on the new thread and builds the source state; if it
    /// fails the thread exits without producing frames. `next_frame` is then
    /// called repeatedly with that state.
    pub fn spawn<S, I, F>(name: &str, init: I, mut next_frame: F, mut sender: FrameSender) -> Self
    where
        S: 'static,
        I: FnOnce() -> Result<S, String> + Send + 'static,
        F: FnMut(&mut S) -> FeedStep + Send + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let frames_sent = Arc::new(AtomicU64::new(0));
        let frames_dropped = Arc::new(AtomicU64::new(0));

        let stop = Arc::clone(&stop_signal);
        let sent = Arc::clone(&frames_sent);
        let dropped = Arc::clone(&frames_dropped);
        let thread_name = name.to_string();

        info!(name = %name, "Starting feed loop");

        let thread_handle = thread::spawn(move || {
            let mut state = match init() {
                Ok(state) => state,
                Err(e) => {
                    warn!(name = %thread_name, error = %e, "Feed initialization failed");
                    return;
                }
            };

            while !stop.load(Ordering::SeqCst) {
                let frame = match next_frame(&mut state) {
                    FeedStep::Frame(frame) => frame,
                    FeedStep::Skip => continue,
                    FeedStep::Stop => {
                        debug!(name = %thread_name, "Frame source finished");
                        break;
                    }
                };

                match sender.try_send(frame) {
                    Ok(()) => {
                        sent.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) if e.is_disconnected() => {
                        debug!(name = %thread_name, "Frame receiver dropped");
                        break;
                    }
                    Err(_) => {
                        let count = dropped.fetch_add(1, Ordering::Relaxed);
                        if count % 60 == 0 {
                            debug!(name = %thread_name, dropped = count + 1, "Frame dropped (channel full)");
                        }
                    }
                }
            }

            info!(name = %thread_name, "Feed loop thread exiting");
        });

        Self {
            name: name.to_string(),
            stop_signal,
            frames_sent,
            frames_dropped,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the feed thread is still alive
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    /// Stop the loop and wait for the thread to finish
    pub fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!(name = %self.name, "Feed loop thread panicked");
            }
            info!(
                name = %self.name,
                sent = self.frames_sent(),
                dropped = self.frames_dropped(),
                "Feed loop stopped"
            );
        }
    }
}

impl Drop for FeedLoop {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!(name = %self.name, "FeedLoop dropped, stopping feed");
            self.stop();
        }
    }
}
