/*
 *  display/render.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  What gets painted for the browser views, the selected row and the overlay
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::prelude::Point;

use crate::display::canvas::{Canvas, TextSize};
use crate::display::color::{self, SelectionColors};
use crate::display::error::DisplayError;
use crate::display::layout::Layout;
use crate::marquee::{scrolled_substring, truncated};
use crate::selection::View;

/// Snapshot of everything a browser frame shows.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub view: View,
    /// Entered folder, shown in the file view header
    pub folder: Option<&'a str>,
    /// Display names of the active list
    pub names: Vec<&'a str>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub marquee_offset: usize,
    pub colors: SelectionColors,
    pub playing: bool,
}

/// Paints frames onto a canvas. Never flushes; the caller does.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    layout: Layout,
}

impl Renderer {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn splash<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), DisplayError> {
        canvas.clear(color::BACKGROUND)?;
        canvas.draw_text(Point::new(10, 40), "Initializing...", color::SPLASH_TEXT, TextSize::Small)
    }

    pub fn blank<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), DisplayError> {
        canvas.clear(color::BACKGROUND)
    }

    /// Whole-screen redraw of the active view.
    pub fn full<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: &Frame<'_>) -> Result<(), DisplayError> {
        let l = &self.layout;
        canvas.clear(color::BACKGROUND)?;

        let header = match (frame.view, frame.folder) {
            (View::Files, Some(folder)) => format!("/ {}", folder),
            _ => "/ ROOT".to_string(),
        };
        canvas.draw_text(l.header_origin(), &header, color::HEADER, TextSize::Small)?;

        if frame.names.is_empty() {
            let message = match frame.view {
                View::Folders => "No folders",
                View::Files => "Empty",
            };
            return canvas.draw_text(l.empty_message_origin(), message, color::HEADER, TextSize::Large);
        }

        let count = frame.names.len();
        let first = frame.scroll_offset;
        for (row, idx) in (first..count).take(l.visible_items).enumerate() {
            let name = frame.names[idx];
            if idx == frame.cursor {
                canvas.fill_rect(l.highlight_rect(row), frame.colors.background)?;
                let text = scrolled_substring(name, l.max_chars, frame.marquee_offset);
                canvas.draw_text(l.row_text_origin(row), text, frame.colors.foreground, TextSize::Large)?;
            } else {
                let text = truncated(name, l.max_chars);
                canvas.draw_text(l.row_text_origin(row), text, color::NORMAL_TEXT, TextSize::Large)?;
            }
        }

        if first > 0 {
            canvas.draw_text(l.scroll_up_origin(), "^", color::SCROLL_MARK, TextSize::Large)?;
        }
        if first + l.visible_items < count {
            canvas.draw_text(l.scroll_down_origin(), "v", color::SCROLL_MARK, TextSize::Large)?;
        }

        if frame.view == View::Files && frame.playing {
            canvas.fill_rect(l.playing_bar(), color::PLAYING)?;
            canvas.draw_text(l.playing_label_origin(), "PLAYING", color::BACKGROUND, TextSize::Small)?;
        }
        Ok(())
    }

    /// Repaint only the text of the selected row.
    pub fn selected_row<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: &Frame<'_>) -> Result<(), DisplayError> {
        let l = &self.layout;
        let Some(name) = frame.names.get(frame.cursor) else {
            return Ok(());
        };
        let Some(row) = frame.cursor.checked_sub(frame.scroll_offset).filter(|r| *r < l.visible_items) else {
            return Ok(());
        };
        canvas.fill_rect(l.row_text_rect(row), frame.colors.background)?;
        let text = scrolled_substring(name, l.max_chars, frame.marquee_offset);
        canvas.draw_text(l.row_text_origin(row), text, frame.colors.foreground, TextSize::Large)
    }

    /// Volume box over the bottom of the screen.
    pub fn volume_overlay<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        percent: u8,
        colors: SelectionColors,
    ) -> Result<(), DisplayError> {
        let l = &self.layout;
        canvas.fill_rect(l.volume_box(), color::BACKGROUND)?;
        canvas.draw_text(l.volume_label_origin(), &format!("VOL {}%", percent), color::HEADER, TextSize::Small)?;
        canvas.draw_rect_outline(l.volume_bar(), color::HEADER)?;
        let fill = l.volume_fill(f32::from(percent) / 100.0);
        if fill.size.width > 0 {
            canvas.fill_rect(fill, colors.foreground)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::canvas::{DrawOp, RecordingCanvas};
    use embedded_graphics::prelude::Size;
    use embedded_graphics::primitives::Rectangle;

    fn frame<'a>(view: View, names: Vec<&'a str>, cursor: usize, scroll_offset: usize) -> Frame<'a> {
        Frame {
            view,
            folder: Some("memes"),
            names,
            cursor,
            scroll_offset,
            marquee_offset: 0,
            colors: SelectionColors::default(),
            playing: false,
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Layout::for_display(240, 135))
    }

    #[test]
    fn test_empty_folder_list() {
        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &frame(View::Folders, vec![], 0, 0)).unwrap();
        assert_eq!(c.texts(), vec!["/ ROOT", "No folders"]);
    }

    #[test]
    fn test_empty_file_list_has_folder_header() {
        let mut c = RecordingCanvas::new(240, 135);
        let mut f = frame(View::Files, vec![], 0, 0);
        f.playing = true;
        renderer().full(&mut c, &f).unwrap();
        assert_eq!(c.texts(), vec!["/ memes", "Empty"]);
    }

    #[test]
    fn test_rows_highlight_and_truncate() {
        let mut c = RecordingCanvas::new(240, 135);
        let long = "a name that is much longer than the row";
        renderer().full(&mut c, &frame(View::Folders, vec!["one", long, "three"], 0, 0)).unwrap();
        assert_eq!(c.texts(), vec!["/ ROOT", "one", "a name that is much lo", "three"]);
        let highlight = Rectangle::new(Point::new(0, 18), Size::new(240, 28));
        assert!(c.ops.contains(&DrawOp::FillRect(highlight, SelectionColors::default().background)));
    }

    #[test]
    fn test_selected_row_uses_marquee_offset() {
        let mut c = RecordingCanvas::new(240, 135);
        let long = "0123456789012345678901234";
        let mut f = frame(View::Folders, vec![long], 0, 0);
        f.marquee_offset = 3;
        renderer().full(&mut c, &f).unwrap();
        assert!(c.contains_text("3456789012345678901234"));
    }

    #[test]
    fn test_scroll_indicators() {
        let names = vec!["a", "b", "c", "d", "e", "f"];
        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &frame(View::Folders, names.clone(), 0, 0)).unwrap();
        assert!(c.contains_text("v"));
        assert!(!c.contains_text("^"));

        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &frame(View::Folders, names.clone(), 3, 1)).unwrap();
        assert!(c.contains_text("v"));
        assert!(c.contains_text("^"));
        assert_eq!(&c.texts()[1..5], &["b", "c", "d", "e"]);

        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &frame(View::Folders, names, 5, 2)).unwrap();
        assert!(!c.contains_text("v"));
        assert!(c.contains_text("^"));
    }

    #[test]
    fn test_playing_bar_only_in_file_view() {
        let mut f = frame(View::Files, vec!["airhorn"], 0, 0);
        f.playing = true;
        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &f).unwrap();
        assert!(c.contains_text("PLAYING"));

        f.view = View::Folders;
        let mut c = RecordingCanvas::new(240, 135);
        renderer().full(&mut c, &f).unwrap();
        assert!(!c.contains_text("PLAYING"));
    }

    #[test]
    fn test_partial_redraw_touches_one_row() {
        let mut f = frame(View::Files, vec!["a", "b", "0123456789012345678901234", "d", "e"], 2, 0);
        f.marquee_offset = 2;
        let mut c = RecordingCanvas::new(240, 135);
        renderer().selected_row(&mut c, &f).unwrap();
        let colors = SelectionColors::default();
        assert_eq!(
            c.ops,
            vec![
                DrawOp::FillRect(Rectangle::new(Point::new(4, 74), Size::new(220, 28)), colors.background),
                DrawOp::Text {
                    origin: Point::new(4, 76),
                    text: "2345678901234567890123".to_string(),
                    color: colors.foreground,
                    size: TextSize::Large,
                },
            ]
        );
    }

    #[test]
    fn test_partial_redraw_on_empty_list_is_noop() {
        let mut c = RecordingCanvas::new(240, 135);
        renderer().selected_row(&mut c, &frame(View::Files, vec![], 0, 0)).unwrap();
        assert!(c.ops.is_empty());
    }

    #[test]
    fn test_volume_overlay() {
        let mut c = RecordingCanvas::new(240, 135);
        let colors = SelectionColors::default();
        renderer().volume_overlay(&mut c, 50, colors).unwrap();
        assert_eq!(c.texts(), vec!["VOL 50%"]);
        assert!(c.ops.contains(&DrawOp::FillRect(
            Rectangle::new(Point::new(11, 106), Size::new(108, 12)),
            colors.foreground
        )));

        let mut c = RecordingCanvas::new(240, 135);
        renderer().volume_overlay(&mut c, 0, colors).unwrap();
        // outline only, no empty fill
        assert_eq!(c.ops.iter().filter(|op| matches!(op, DrawOp::FillRect(..))).count(), 1);
    }
}
