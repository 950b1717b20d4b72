// SPDX-License-Identifier: GPL-3.0-only

//! Terminal viewfinder
//!
//! Hosts the presenter in a ratatui UI: the live feed is drawn with
//! half-block characters, keys and the mouse stand in for touch gestures,
//! and photos are handed to the capture worker.
//!
//! Everything below runs on the UI thread. Feed frames and capture outcomes
//! arrive over channels that are drained at the start of every iteration.

pub mod input;
pub mod surface;
pub mod widgets;

use crate::app::render::{DiffRenderer, ViewfinderSurface};
use crate::app::state::ViewState;
use crate::app::{Intent, Presenter};
use crate::backends::camera::CameraBackend;
use crate::config::Config;
use crate::constants::UI_POLL_INTERVAL;
use crate::errors::PhotoError;
use crate::pipelines::photo::{CaptureOutcome, CaptureWorker, PhotoPipeline};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Action, InputMapper};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use surface::TerminalSurface;
use tracing::{error, info, warn};
use widgets::{FrameWidget, HelpOverlay, StatusBar, Toast, ZoomLabel};

type ViewfinderPresenter = Presenter<Arc<dyn CameraBackend>, DiffRenderer<TerminalSurface>>;

/// Run the terminal viewfinder until the user quits
pub fn run(
    backend: Arc<dyn CameraBackend>,
    config: &Config,
    photo_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let result = run_app(&mut terminal, backend, config, photo_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: Arc<dyn CameraBackend>,
    config: &Config,
    photo_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let lens = if !backend.has_lens(config.initial_lens)
        && backend.has_lens(config.initial_lens.opposite())
    {
        warn!(lens = %config.initial_lens, "Configured lens missing, starting with the other one");
        config.initial_lens.opposite()
    } else {
        config.initial_lens
    };

    let surface = TerminalSurface::new(Arc::clone(&backend), config.notification_duration());
    let mut presenter: ViewfinderPresenter = Presenter::with_state(
        backend,
        DiffRenderer::new(surface),
        ViewState::initial(lens, config.initial_button_style),
    );
    presenter.dispatch(Intent::Initialize);

    let (mut worker, mut outcomes) =
        CaptureWorker::spawn(PhotoPipeline::new(config.jpeg_quality), photo_dir.clone())?;
    let mut input = InputMapper::new(config.pinch_step());
    let mut show_help = false;

    info!(photo_dir = %photo_dir.display(), "Viewfinder running");

    loop {
        let surface = presenter.renderer_mut().surface_mut();
        surface.poll_frames();
        while let Ok(outcome) = outcomes.try_recv() {
            if let CaptureOutcome::Saved(path) = &outcome {
                info!(path = %path.display(), "Photo captured");
            }
            surface.notify(outcome.message());
        }

        let now = Instant::now();
        terminal.draw(|f| {
            draw(f.area(), f.buffer_mut(), presenter.renderer().surface(), show_help, now);
        })?;

        if !event::poll(UI_POLL_INTERVAL)? {
            continue;
        }
        let Some(action) = input.map(&event::read()?, Instant::now()) else {
            continue;
        };

        match action {
            Action::Quit => break,
            Action::ToggleHelp => show_help = !show_help,
            Action::Gesture(gesture) => {
                if let Some(intent) = gesture.intent() {
                    presenter.dispatch(intent);
                }
            }
            Action::Capture => {
                let surface = presenter.renderer_mut().surface_mut();
                let submitted = surface
                    .latest_frame()
                    .ok_or(PhotoError::NoFrameAvailable)
                    .and_then(|frame| worker.submit(frame));
                if let Err(e) = submitted {
                    error!(error = %e, "Photo capture failed");
                    surface.notify(CaptureOutcome::Failed(e).message());
                }
            }
            Action::OpenPhotos => {
                if let Err(e) = open_photo_directory(&photo_dir) {
                    error!(error = %e, "Failed to open photo directory");
                    presenter
                        .renderer_mut()
                        .surface_mut()
                        .notify(format!("Cannot open {}: {}", photo_dir.display(), e));
                }
            }
        }
    }

    worker.shutdown();
    Ok(())
}

fn draw(
    area: Rect,
    buf: &mut ratatui::buffer::Buffer,
    surface: &TerminalSurface,
    show_help: bool,
    now: Instant,
) {
    use ratatui::widgets::Widget;

    // Reserve bottom line for status
    let preview = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    let frame = surface.latest_frame();
    FrameWidget {
        frame: frame.as_deref(),
        crop: frame
            .as_deref()
            .map(|f| surface.frame_crop(f))
            .unwrap_or_default(),
    }
    .render(preview, buf);

    if let Some(label) = surface.zoom_label() {
        ZoomLabel(label).render(preview, buf);
    }
    if let Some(message) = surface.notification(now) {
        Toast(message).render(preview, buf);
    }
    if show_help {
        HelpOverlay.render(preview, buf);
    }

    StatusBar {
        button_rgb: surface.button_rgb(),
        lens: surface.bound_lens(),
        backend: surface.backend_name(),
        message: "Enter capture | h help | q quit",
    }
    .render(status_area, buf);
}

fn open_photo_directory(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    open::that(dir)
}
