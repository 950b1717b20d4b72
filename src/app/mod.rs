// SPDX-License-Identifier: MPL-2.0

//! Viewfinder core
//!
//! # Architecture
//!
//! - `state`: the immutable [`ViewState`] and its value types
//! - `presenter`: the reducer that turns intents into new states
//! - `gestures`: mapping from pinch/tap/fling to intents
//! - `render`: the renderer contract and the diffing renderer
//!
//! Data flows one way: gestures → intents → [`Presenter`] → [`Renderer`].

pub mod gestures;
pub mod presenter;
pub mod render;
pub mod state;

pub use gestures::Gesture;
pub use presenter::{Intent, Presenter};
pub use render::{DiffRenderer, Renderer, ViewfinderSurface};
pub use state::{ButtonStyle, LensFacing, Size, ViewState, ZoomRect};
