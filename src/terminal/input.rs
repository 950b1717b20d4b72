// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard and mouse input
//!
//! Terminal events are turned into the same gestures a touch screen would
//! produce, plus a few host-only actions.

use crate::app::gestures::Gesture;
use crate::constants::KEYBOARD_FLING_VELOCITY;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Instant;

/// Drags shorter than this (in half-cell units) count as a tap
const DRAG_THRESHOLD: f32 = 2.0;

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Gesture(Gesture),
    Capture,
    OpenPhotos,
    ToggleHelp,
    Quit,
}

/// Stateful event mapper; remembers where a mouse drag started
pub struct InputMapper {
    pinch_step: f32,
    drag_start: Option<(u16, u16, Instant)>,
}

impl InputMapper {
    /// `pinch_step` is the zoom factor of one key press or scroll notch
    pub fn new(pinch_step: f32) -> Self {
        Self {
            pinch_step,
            drag_start: None,
        }
    }

    pub fn map(&mut self, event: &Event, now: Instant) -> Option<Action> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse, now),
            _ => None,
        }
    }

    fn pinch_out(&self) -> Action {
        Action::Gesture(Gesture::Pinch {
            scale_factor: self.pinch_step,
        })
    }

    fn pinch_in(&self) -> Action {
        Action::Gesture(Gesture::Pinch {
            scale_factor: 1.0 / self.pinch_step,
        })
    }

    fn map_key(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        let action = match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('+') | KeyCode::Char('=') => self.pinch_out(),
            KeyCode::Char('-') => self.pinch_in(),
            KeyCode::Char(' ') | KeyCode::Tab => Action::Gesture(Gesture::Tap),
            KeyCode::Left => Action::Gesture(Gesture::Fling {
                velocity_x: -KEYBOARD_FLING_VELOCITY,
                velocity_y: 0.0,
            }),
            KeyCode::Right => Action::Gesture(Gesture::Fling {
                velocity_x: KEYBOARD_FLING_VELOCITY,
                velocity_y: 0.0,
            }),
            KeyCode::Enter | KeyCode::Char('p') => Action::Capture,
            KeyCode::Char('o') => Action::OpenPhotos,
            KeyCode::Char('h') => Action::ToggleHelp,
            _ => return None,
        };
        Some(action)
    }

    fn map_mouse(&mut self, mouse: &MouseEvent, now: Instant) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(self.pinch_out()),
            MouseEventKind::ScrollDown => Some(self.pinch_in()),
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some((mouse.column, mouse.row, now));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row, started) = self.drag_start.take()?;
                // Cells are about twice as tall as wide
                let dx = mouse.column as f32 - column as f32;
                let dy = (mouse.row as f32 - row as f32) * 2.0;
                if dx.abs() + dy.abs() < DRAG_THRESHOLD {
                    return Some(Action::Gesture(Gesture::Tap));
                }
                let seconds = now.duration_since(started).as_secs_f32().max(0.001);
                Some(Action::Gesture(Gesture::Fling {
                    velocity_x: dx / seconds,
                    velocity_y: dy / seconds,
                }))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_zoom_keys_use_pinch_step() {
        let mut input = InputMapper::new(1.25);
        let now = Instant::now();
        assert_eq!(
            input.map(&key(KeyCode::Char('+')), now),
            Some(Action::Gesture(Gesture::Pinch { scale_factor: 1.25 }))
        );
        assert_eq!(
            input.map(&key(KeyCode::Char('-')), now),
            Some(Action::Gesture(Gesture::Pinch { scale_factor: 0.8 }))
        );
    }

    #[test]
    fn test_arrow_keys_fling_horizontally() {
        let mut input = InputMapper::new(1.1);
        let now = Instant::now();
        let Some(Action::Gesture(right)) = input.map(&key(KeyCode::Right), now) else {
            panic!("right arrow should fling");
        };
        assert_eq!(
            right.intent(),
            Some(crate::app::Intent::CycleButtonStyle(-1))
        );
    }

    #[test]
    fn test_ctrl_c_and_q_quit() {
        let mut input = InputMapper::new(1.1);
        let now = Instant::now();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(input.map(&ctrl_c, now), Some(Action::Quit));
        assert_eq!(input.map(&key(KeyCode::Char('q')), now), Some(Action::Quit));
        assert_eq!(input.map(&key(KeyCode::Char('c')), now), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut input = InputMapper::new(1.1);
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(input.map(&Event::Key(release), Instant::now()), None);
    }

    #[test]
    fn test_click_is_tap() {
        let mut input = InputMapper::new(1.1);
        let now = Instant::now();
        assert_eq!(
            input.map(&mouse(MouseEventKind::Down(MouseButton::Left), 10, 5), now),
            None
        );
        assert_eq!(
            input.map(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 5), now),
            Some(Action::Gesture(Gesture::Tap))
        );
    }

    #[test]
    fn test_horizontal_drag_is_fling() {
        let mut input = InputMapper::new(1.1);
        let start = Instant::now();
        input.map(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 5), start);
        let action = input.map(
            &mouse(MouseEventKind::Up(MouseButton::Left), 10, 6),
            start + Duration::from_millis(100),
        );
        let Some(Action::Gesture(gesture)) = action else {
            panic!("drag should produce a gesture");
        };
        assert_eq!(
            gesture.intent(),
            Some(crate::app::Intent::CycleButtonStyle(1))
        );
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut input = InputMapper::new(1.1);
        assert_eq!(
            input.map(
                &mouse(MouseEventKind::Up(MouseButton::Left), 1, 1),
                Instant::now()
            ),
            None
        );
    }

    #[test]
    fn test_scroll_zooms() {
        let mut input = InputMapper::new(2.0);
        assert_eq!(
            input.map(&mouse(MouseEventKind::ScrollDown, 0, 0), Instant::now()),
            Some(Action::Gesture(Gesture::Pinch { scale_factor: 0.5 }))
        );
    }
}
