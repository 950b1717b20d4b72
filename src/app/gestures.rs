// SPDX-License-Identifier: GPL-3.0-only

//! Gesture to intent mapping

use super::presenter::Intent;

/// Touch-style gestures, independent of how the host detects them
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Two-finger pinch; factors above 1 spread the fingers
    Pinch { scale_factor: f32 },
    /// Single tap anywhere on the preview
    Tap,
    /// Swipe released with the given velocity, in pixels per second
    Fling { velocity_x: f32, velocity_y: f32 },
}

impl Gesture {
    /// The intent this gesture triggers, if any
    pub fn intent(self) -> Option<Intent> {
        match self {
            Gesture::Pinch { scale_factor } => Some(Intent::Zoom(scale_factor)),
            Gesture::Tap => Some(Intent::SwitchLens),
            Gesture::Fling {
                velocity_x,
                velocity_y,
            } => fling_direction(velocity_x, velocity_y).map(Intent::CycleButtonStyle),
        }
    }
}

/// Button style step for a fling, `None` unless it is mostly horizontal
///
/// Swiping right steps backwards through the cycle.
pub fn fling_direction(velocity_x: f32, velocity_y: f32) -> Option<i32> {
    if velocity_x.abs() > velocity_y.abs() {
        Some(if velocity_x > 0.0 { -1 } else { 1 })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinch_and_tap() {
        assert_eq!(
            Gesture::Pinch { scale_factor: 1.25 }.intent(),
            Some(Intent::Zoom(1.25))
        );
        assert_eq!(Gesture::Tap.intent(), Some(Intent::SwitchLens));
    }

    #[test]
    fn test_horizontal_flings() {
        assert_eq!(fling_direction(800.0, 10.0), Some(-1));
        assert_eq!(fling_direction(-800.0, -10.0), Some(1));
    }

    #[test]
    fn test_vertical_or_diagonal_fling_is_ignored() {
        assert_eq!(fling_direction(10.0, 800.0), None);
        assert_eq!(fling_direction(500.0, -500.0), None);
        assert_eq!(
            Gesture::Fling {
                velocity_x: 0.0,
                velocity_y: 0.0
            }
            .intent(),
            None
        );
    }
}
