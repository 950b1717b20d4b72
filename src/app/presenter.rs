// SPDX-License-Identifier: GPL-3.0-only

//! View-state reducer
//!
//! The presenter owns the single [`ViewState`] of the viewfinder. Each intent
//! derives a successor from the current state and the capability provider's
//! answers, stores it, and hands it to the renderer. Nothing here touches the
//! camera or the screen directly.

use super::render::Renderer;
use super::state::{LensFacing, Size, ViewState, ZoomRect, clamp_zoom};
use crate::backends::camera::CapabilityProvider;
use crate::constants::MIN_ZOOM;
use tracing::{debug, info};

/// Something the user asked the viewfinder to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Query the active lens and reset the crop
    Initialize,
    /// Move to the opposite lens if it exists
    SwitchLens,
    /// Multiply the zoom factor
    Zoom(f32),
    /// Step the capture button color through its cycle
    CycleButtonStyle(i32),
}

pub struct Presenter<P, R> {
    provider: P,
    renderer: R,
    state: ViewState,
}

impl<P: CapabilityProvider, R: Renderer> Presenter<P, R> {
    /// Presenter starting from the default state (back lens, white button)
    pub fn new(provider: P, renderer: R) -> Self {
        Self::with_state(provider, renderer, ViewState::default())
    }

    pub fn with_state(provider: P, renderer: R, state: ViewState) -> Self {
        Self {
            provider,
            renderer,
            state,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Route an intent to its handler
    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Initialize => self.on_view_initialized(),
            Intent::SwitchLens => {
                self.switch_lens();
            }
            Intent::Zoom(scale_factor) => self.zoom(scale_factor),
            Intent::CycleButtonStyle(direction) => self.cycle_button_style(direction),
        }
    }

    /// Read the sensor size of the current lens and show the full frame
    pub fn on_view_initialized(&mut self) {
        let resolution = self.resolution_of(self.state.lens_facing);
        info!(lens = %self.state.lens_facing, resolution = %resolution, "Viewfinder initialized");
        self.update(|state| ViewState {
            resolution,
            zoom_rect: resolution.to_rect(),
            ..state
        });
    }

    /// Switch to the opposite lens
    ///
    /// Returns `false` and leaves everything untouched (no render) when that
    /// lens does not exist.
    pub fn switch_lens(&mut self) -> bool {
        let target = self.state.lens_facing.opposite();
        if !self.provider.has_lens(target) {
            debug!(lens = %target, "Lens switch ignored, no such camera");
            return false;
        }

        let resolution = self.resolution_of(target);
        info!(lens = %target, resolution = %resolution, "Switching lens");
        self.update(|state| ViewState {
            lens_facing: target,
            resolution,
            zoom: MIN_ZOOM,
            zoom_rect: resolution.to_rect(),
            ..state
        });
        true
    }

    /// Scale the zoom factor by `scale_factor`, clamped to the zoom range
    ///
    /// The crop rectangle is derived from the zoom value in effect *before*
    /// this call, so it trails the factor by one step.
    pub fn zoom(&mut self, scale_factor: f32) {
        let previous = self.state.zoom;
        let zoom = clamp_zoom(previous * scale_factor);
        let zoom_rect = crop_rect(self.state.resolution, previous);
        debug!(scale_factor, zoom, rect = %zoom_rect, "Zoom");
        self.update(|state| ViewState {
            zoom,
            zoom_rect,
            ..state
        });
    }

    /// Step the button color `direction` places, wrapping in both directions
    pub fn cycle_button_style(&mut self, direction: i32) {
        let button_style = self.state.button_style.cycled(direction);
        debug!(direction, style = button_style.display_name(), "Button style");
        self.update(|state| ViewState {
            button_style,
            ..state
        });
    }

    fn resolution_of(&self, lens: LensFacing) -> Size {
        self.provider.resolution_for(lens).unwrap_or(Size::ZERO)
    }

    fn update(&mut self, transition: impl FnOnce(ViewState) -> ViewState) {
        self.state = transition(self.state);
        self.renderer.render(&self.state);
    }
}

/// Centered crop of `resolution` for a zoom factor
///
/// Margins are computed in `f32` and truncated toward zero, so odd sizes
/// lose a pixel on the far edge.
pub fn crop_rect(resolution: Size, zoom: f32) -> ZoomRect {
    let zoom = clamp_zoom(zoom);
    let width = resolution.width as f32;
    let height = resolution.height as f32;

    let horizontal_margin = (width - width / zoom) / 2.0;
    let vertical_margin = (height - height / zoom) / 2.0;

    ZoomRect::new(
        horizontal_margin as i32,
        vertical_margin as i32,
        (width - horizontal_margin) as i32,
        (height - vertical_margin) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ButtonStyle;

    struct FixedProvider {
        back: Option<Size>,
        front: Option<Size>,
    }

    impl CapabilityProvider for FixedProvider {
        fn resolution_for(&self, lens: LensFacing) -> Option<Size> {
            match lens {
                LensFacing::Back => self.back,
                LensFacing::Front => self.front,
            }
        }

        fn has_lens(&self, lens: LensFacing) -> bool {
            self.resolution_for(lens).is_some()
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        renders: usize,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, _state: &ViewState) {
            self.renders += 1;
        }
    }

    fn presenter(front: Option<Size>) -> Presenter<FixedProvider, CountingRenderer> {
        let provider = FixedProvider {
            back: Some(Size::new(1000, 800)),
            front,
        };
        let mut presenter = Presenter::new(provider, CountingRenderer::default());
        presenter.on_view_initialized();
        presenter
    }

    #[test]
    fn test_initialize_reads_back_lens() {
        let presenter = presenter(None);
        let state = presenter.state();
        assert_eq!(state.lens_facing, LensFacing::Back);
        assert_eq!(state.resolution, Size::new(1000, 800));
        assert_eq!(state.zoom_rect, ZoomRect::new(0, 0, 1000, 800));
        assert_eq!(presenter.renderer().renders, 1);
    }

    #[test]
    fn test_missing_resolution_is_zero() {
        let provider = FixedProvider {
            back: None,
            front: None,
        };
        let mut presenter = Presenter::new(provider, CountingRenderer::default());
        presenter.on_view_initialized();
        assert_eq!(presenter.state().resolution, Size::ZERO);
        assert_eq!(presenter.state().zoom_rect, ZoomRect::default());
    }

    #[test]
    fn test_stale_margin_regression() {
        let mut presenter = presenter(None);
        presenter.zoom(1.5);
        assert_eq!(presenter.state().zoom, 1.5);
        assert_eq!(presenter.state().zoom_rect, ZoomRect::new(0, 0, 1000, 800));

        // Next step uses the 1.5 margins
        presenter.zoom(1.0);
        assert_eq!(presenter.state().zoom, 1.5);
        assert_eq!(presenter.state().zoom_rect, ZoomRect::new(166, 133, 833, 666));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut presenter = presenter(None);
        presenter.zoom(10.0);
        assert_eq!(presenter.state().zoom, 2.0);
        presenter.zoom(0.01);
        assert_eq!(presenter.state().zoom, 1.0);
        presenter.zoom(f32::NAN);
        assert_eq!(presenter.state().zoom, 1.0);
    }

    #[test]
    fn test_switch_lens_veto_does_not_render() {
        let mut presenter = presenter(None);
        presenter.zoom(1.5);
        let before = presenter.state();
        let renders = presenter.renderer().renders;

        assert!(!presenter.switch_lens());
        assert_eq!(presenter.state(), before);
        assert_eq!(presenter.renderer().renders, renders);
    }

    #[test]
    fn test_switch_lens_resets_zoom() {
        let mut presenter = presenter(Some(Size::new(640, 480)));
        presenter.zoom(2.0);
        presenter.zoom(1.0);

        assert!(presenter.switch_lens());
        let state = presenter.state();
        assert_eq!(state.lens_facing, LensFacing::Front);
        assert_eq!(state.resolution, Size::new(640, 480));
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.zoom_rect, ZoomRect::new(0, 0, 640, 480));
    }

    #[test]
    fn test_dispatch_routes_intents() {
        let mut presenter = presenter(Some(Size::new(640, 480)));
        presenter.dispatch(Intent::CycleButtonStyle(-1));
        presenter.dispatch(Intent::SwitchLens);
        presenter.dispatch(Intent::Zoom(1.2));

        let state = presenter.state();
        assert_eq!(state.button_style, ButtonStyle::Blue);
        assert_eq!(state.lens_facing, LensFacing::Front);
        assert!((state.zoom - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_crop_rect_at_max_zoom() {
        assert_eq!(
            crop_rect(Size::new(1000, 800), 2.0),
            ZoomRect::new(250, 200, 750, 600)
        );
        assert_eq!(crop_rect(Size::ZERO, 2.0), ZoomRect::default());
    }
}
