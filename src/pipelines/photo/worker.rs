// SPDX-License-Identifier: GPL-3.0-only

//! Capture worker thread
//!
//! One thread owns a current-thread tokio runtime and runs the photo
//! pipeline for each submitted frame, in order. Outcomes come back over an
//! unbounded channel that the UI loop drains on its own thread.

use super::PhotoPipeline;
use crate::backends::camera::CameraFrame;
use crate::errors::{AppError, PhotoError};
use futures::channel::mpsc;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info};

/// Result of one capture
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Saved(PathBuf),
    Failed(PhotoError),
}

impl CaptureOutcome {
    /// Notification text for the user
    pub fn message(&self) -> String {
        match self {
            CaptureOutcome::Saved(path) => format!("Photo capture succeeded: {}", path.display()),
            CaptureOutcome::Failed(e) => format!("Photo capture failed: {}", e),
        }
    }
}

pub type OutcomeReceiver = mpsc::UnboundedReceiver<CaptureOutcome>;

/// Dedicated capture-to-storage thread
pub struct CaptureWorker {
    jobs: Option<tokio::sync::mpsc::UnboundedSender<Arc<CameraFrame>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Start the worker; photos are written to `output_dir`
    pub fn spawn(
        pipeline: PhotoPipeline,
        output_dir: PathBuf,
    ) -> Result<(Self, OutcomeReceiver), AppError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::Runtime(format!("capture runtime: {}", e)))?;

        let (job_tx, mut job_rx) = tokio::sync::mpsc::unbounded_channel::<Arc<CameraFrame>>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded();

        let thread_handle = std::thread::Builder::new()
            .name("capture-worker".to_string())
            .spawn(move || {
                info!(dir = %output_dir.display(), "Capture worker started");
                runtime.block_on(async {
                    while let Some(frame) = job_rx.recv().await {
                        debug!(sequence = frame.sequence, "Capture job received");
                        let outcome = match pipeline.capture_and_save(frame, &output_dir).await {
                            Ok(path) => CaptureOutcome::Saved(path),
                            Err(e) => {
                                error!(error = %e, "Photo capture failed");
                                CaptureOutcome::Failed(e)
                            }
                        };
                        if outcome_tx.unbounded_send(outcome).is_err() {
                            debug!("Outcome receiver dropped");
                        }
                    }
                });
                info!("Capture worker exiting");
            })
            .map_err(|e| AppError::Runtime(format!("capture thread: {}", e)))?;

        Ok((
            Self {
                jobs: Some(job_tx),
                thread_handle: Some(thread_handle),
            },
            outcome_rx,
        ))
    }

    /// Queue `frame` for saving; returns immediately
    pub fn submit(&self, frame: Arc<CameraFrame>) -> Result<(), PhotoError> {
        let jobs = self.jobs.as_ref().ok_or(PhotoError::WorkerUnavailable)?;
        jobs.send(frame).map_err(|_| PhotoError::WorkerUnavailable)
    }

    /// Finish queued jobs and stop the thread
    pub fn shutdown(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.thread_handle.take()
            && handle.join().is_err()
        {
            error!("Capture worker panicked");
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
