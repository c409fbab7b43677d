/*
 *  display/canvas.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text/rectangle canvas over embedded-graphics targets
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

use core::fmt::Debug;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_7X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::display::error::DisplayError;
use crate::display::traits::DisplayDriver;

/// Text sizes used by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// Header, status bar and overlay label
    Small,
    /// List rows, empty-state messages and scroll marks
    Large,
}

impl TextSize {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &FONT_7X13,
            TextSize::Large => &FONT_10X20,
        }
    }

    /// Horizontal advance of one character
    pub fn char_width(self) -> u32 {
        let font = self.font();
        font.character_size.width + font.character_spacing
    }
}

/// Drawing surface used by the renderer. Pixels are never read back.
pub trait Canvas {
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError>;

    fn draw_rect_outline(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw `text` with its top-left corner at `origin`
    fn draw_text(&mut self, origin: Point, text: &str, color: Rgb565, size: TextSize) -> Result<(), DisplayError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Push what was drawn to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;
}

/// `Canvas` over a driver that is also an embedded-graphics draw target
pub struct GraphicsCanvas<D> {
    target: D,
}

impl<D> GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565> + DisplayDriver,
    D::Error: Debug,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn driver(&self) -> &D {
        &self.target
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_driver(self) -> D {
        self.target
    }
}

fn drawing<E: Debug>(e: E) -> DisplayError {
    DisplayError::DrawingError(format!("{:?}", e))
}

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565> + DisplayDriver,
    D::Error: Debug,
{
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        DrawTarget::clear(&mut self.target, color).map_err(drawing)
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        rect.into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
            .map_err(drawing)
    }

    fn draw_rect_outline(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        rect.into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .map_err(drawing)
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Rgb565, size: TextSize) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(size.font(), color);
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(drawing)
    }

    fn width(&self) -> u32 {
        DisplayDriver::dimensions(&self.target).0
    }

    fn height(&self) -> u32 {
        DisplayDriver::dimensions(&self.target).1
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.target.flush()
    }
}

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Rgb565),
    FillRect(Rectangle, Rgb565),
    Outline(Rectangle, Rgb565),
    Text { origin: Point, text: String, color: Rgb565, size: TextSize },
    Flush,
}

/// Canvas that records calls instead of drawing them.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// All text drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| *t == needle)
    }

    pub fn clear_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear(_))).count()
    }

    pub fn flush_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Flush)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::FillRect(rect, color));
        Ok(())
    }

    fn draw_rect_outline(&mut self, rect: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::Outline(rect, color));
        Ok(())
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Rgb565, size: TextSize) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::Text { origin, text: text.to_string(), color, size });
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.ops.push(DrawOp::Flush);
        Ok(())
    }
}
