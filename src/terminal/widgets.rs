// SPDX-License-Identifier: GPL-3.0-only

//! Widgets for the terminal viewfinder
//!
//! Frames are drawn with Unicode half-block characters: each cell shows two
//! vertical pixels (foreground on top, background below).

use crate::app::state::LensFacing;
use crate::backends::camera::CameraFrame;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Key bindings shown by the help overlay
const HELP_LINES: [&str; 8] = [
    "+ / = / scroll up    zoom in",
    "- / scroll down      zoom out",
    "Space / Tab / click  switch lens",
    "← / → / drag         button color",
    "Enter / p            take photo",
    "o                    open photos",
    "h                    toggle help",
    "q / Ctrl+C           quit",
];

/// Cropped camera frame
pub struct FrameWidget<'a> {
    pub frame: Option<&'a CameraFrame>,
    /// Visible part of the frame as `(x, y, width, height)`
    pub crop: (u32, u32, u32, u32),
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame else {
            centered_text("Waiting for camera...", area, buf, Style::default());
            return;
        };

        let (crop_x, crop_y, crop_w, crop_h) = self.crop;
        let (display_width, display_height) = fit_display(crop_w, crop_h, area.width, area.height);
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width - display_width) / 2;
        let y_offset = area.y + (area.height - display_height) / 2;

        let x_scale = crop_w as f64 / display_width as f64;
        let y_scale = crop_h as f64 / (display_height as f64 * 2.0);

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = crop_x + (tx as f64 * x_scale) as u32;
                let src_y_top = crop_y + (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = crop_y + ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (tr, tg, tb) = frame.rgb_at(src_x, src_y_top);
                let (br, bg, bb) = frame.rgb_at(src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(tr, tg, tb));
                    cell.set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}

/// Largest `(columns, rows)` showing a `width` x `height` image at its
/// aspect ratio inside `columns` x `rows` cells
pub fn fit_display(width: u32, height: u32, columns: u16, rows: u16) -> (u16, u16) {
    if width == 0 || height == 0 || columns == 0 || rows == 0 {
        return (0, 0);
    }

    let aspect = width as f64 / height as f64;
    let term_width = columns as f64;
    let term_height = rows as f64 * 2.0;

    if term_width / term_height > aspect {
        // Terminal is wider - fit to height
        let w = term_height * aspect;
        ((w as u16).clamp(1, columns), rows)
    } else {
        // Terminal is taller - fit to width
        let h = term_width / aspect;
        (columns, ((h / 2.0) as u16).clamp(1, rows))
    }
}

/// Bottom status line with the capture button
pub struct StatusBar<'a> {
    pub button_rgb: (u8, u8, u8),
    pub lens: Option<LensFacing>,
    pub backend: &'a str,
    pub message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().fg(Color::White).bg(Color::DarkGray);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_style(base);
            }
        }

        let (r, g, b) = self.button_rgb;
        let (x, _) = buf.set_stringn(
            area.x,
            area.y,
            " ● ",
            area.width as usize,
            base.fg(Color::Rgb(r, g, b)),
        );

        let lens = self.lens.map(|l| l.as_str()).unwrap_or("no camera");
        let text = format!("{} | {} | {}", lens, self.backend, self.message);
        let remaining = (area.x + area.width).saturating_sub(x) as usize;
        if remaining == 0 {
            return;
        }
        let text: String = text.chars().take(remaining).collect();
        buf.set_string(x, area.y, text, base);
    }
}

/// Zoom indicator in the top-right corner of the preview
pub struct ZoomLabel<'a>(pub &'a str);

impl Widget for ZoomLabel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = format!(" {} ", self.0);
        let width = text.chars().count() as u16;
        if area.width < width || area.height == 0 {
            return;
        }
        buf.set_string(
            area.x + area.width - width,
            area.y,
            text,
            Style::default().fg(Color::Black).bg(Color::Yellow),
        );
    }
}

/// Transient message near the bottom of the preview
pub struct Toast<'a>(pub &'a str);

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let line = Rect {
            y: area.y + area.height - 1,
            height: 1,
            ..area
        };
        let text: String = format!(" {} ", self.0)
            .chars()
            .take(area.width as usize)
            .collect();
        centered_text(&text, line, buf, Style::default().fg(Color::White).bg(Color::Black));
    }
}

/// Key binding overlay
pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (HELP_LINES.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4)
            .min(area.width);
        let height = (HELP_LINES.len() as u16 + 2).min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        Clear.render(popup, buf);
        Paragraph::new(HELP_LINES.iter().map(|l| Line::from(*l)).collect::<Vec<_>>())
            .block(Block::bordered().title(" Help "))
            .render(popup, buf);
    }
}

fn centered_text(text: &str, area: Rect, buf: &mut Buffer, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let len = text.chars().count() as u16;
    let x = area.x + area.width.saturating_sub(len) / 2;
    let y = area.y + area.height / 2;
    buf.set_string(x, y, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_display_wide_terminal() {
        // 4:3 image in 100x20 cells (100x40 half-block pixels)
        assert_eq!(fit_display(640, 480, 100, 20), (53, 20));
    }

    #[test]
    fn test_fit_display_tall_terminal() {
        // 16:9 image in 40x40 cells
        assert_eq!(fit_display(1920, 1080, 40, 40), (40, 11));
    }

    #[test]
    fn test_fit_display_degenerate() {
        assert_eq!(fit_display(0, 480, 100, 20), (0, 0));
        assert_eq!(fit_display(640, 480, 0, 20), (0, 0));
    }

    #[test]
    fn test_frame_widget_uses_crop() {
        // Left half red, right half blue
        let mut data = Vec::new();
        for _y in 0..2 {
            data.extend_from_slice(&[255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255]);
        }
        let frame = CameraFrame::new(4, 2, data, 0);
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);

        FrameWidget {
            frame: Some(&frame),
            crop: (2, 0, 2, 2),
        }
        .render(area, &mut buf);

        let cell = buf.cell((0, 0)).unwrap();
        assert_eq!(cell.fg, Color::Rgb(0, 0, 255));
        assert_eq!(cell.symbol(), "▀");
    }

    #[test]
    fn test_status_bar_shows_tinted_button() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            button_rgb: (0x33, 0xB5, 0xE5),
            lens: Some(LensFacing::Front),
            backend: "Virtual",
            message: "h help",
        }
        .render(area, &mut buf);

        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "●");
        assert_eq!(buf.cell((1, 0)).unwrap().fg, Color::Rgb(0x33, 0xB5, 0xE5));
    }
}
