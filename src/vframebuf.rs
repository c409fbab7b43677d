/*
 *  vframebuf.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Runtime-sized RGB565 framebuffer with dirty-row tracking
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

use core::convert::Infallible;
use core::ops::Range;

use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::color::raw565;

/// A runtime-sized RGB565 framebuffer for embedded-graphics.
///
/// Remembers which rows were written since the last `take_dirty` so a
/// partial redraw only pushes the rows it touched.
#[derive(Debug, Clone)]
pub struct VarFrameBuf {
    buf: Vec<Rgb565>,
    w: usize,
    h: usize,
    dirty: Option<Range<usize>>,
}

impl VarFrameBuf {
    pub fn new(width: u32, height: u32, fill: Rgb565) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h, dirty: None }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[Rgb565] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < self.w && y < self.h { Some(self.buf[y * self.w + x]) } else { None }
    }

    /// Clear to a color
    pub fn clear_color(&mut self, color: Rgb565) {
        self.buf.fill(color);
        self.mark(0, self.h);
    }

    /// Rows written since the last call, then forget them.
    pub fn take_dirty(&mut self) -> Option<Range<usize>> {
        self.dirty.take()
    }

    /// Mark everything dirty, e.g. after the panel was blanked behind our back.
    pub fn invalidate(&mut self) {
        self.mark(0, self.h);
    }

    /// Copy `rows` as little-endian RGB565 into `out`, which is laid out
    /// with `stride` bytes per row.
    pub fn copy_rows_le(&self, rows: Range<usize>, out: &mut [u8], stride: usize) {
        let rows = rows.start.min(self.h)..rows.end.min(self.h);
        for y in rows {
            let src = &self.buf[y * self.w..(y + 1) * self.w];
            let base = y * stride;
            for (x, c) in src.iter().enumerate() {
                let i = base + x * 2;
                if i + 1 < out.len() {
                    out[i..i + 2].copy_from_slice(&raw565(*c).to_le_bytes());
                }
            }
        }
    }

    #[inline]
    fn mark(&mut self, y0: usize, y1: usize) {
        if y0 >= y1 {
            return;
        }
        self.dirty = Some(match self.dirty.take() {
            Some(r) => r.start.min(y0)..r.end.max(y1),
            None => y0..y1,
        });
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for VarFrameBuf {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for VarFrameBuf {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
                let y = p.y as usize;
                self.mark(y, y + 1);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip to the buffer, then fill row slices directly
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        let (w, h) = (width as usize, height as usize);
        for row in y0..y0 + h {
            let base = row * self.w + x0;
            self.buf[base..base + w].fill(color);
        }
        self.mark(y0, y0 + h);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::rgb565;

    #[test]
    fn test_fill_solid_clips_and_marks_rows() {
        let mut fb = VarFrameBuf::new(8, 8, Rgb565::BLACK);
        let red = rgb565(0xF800);
        fb.fill_solid(&Rectangle::new(Point::new(6, 2), Size::new(10, 3)), red).unwrap();
        assert_eq!(fb.pixel(7, 2), Some(red));
        assert_eq!(fb.pixel(5, 2), Some(Rgb565::BLACK));
        assert_eq!(fb.take_dirty(), Some(2..5));
        assert_eq!(fb.take_dirty(), None);
    }

    #[test]
    fn test_dirty_rows_merge() {
        let mut fb = VarFrameBuf::new(4, 10, Rgb565::BLACK);
        fb.draw_iter([Pixel(Point::new(0, 1), Rgb565::WHITE), Pixel(Point::new(3, 6), Rgb565::WHITE)])
            .unwrap();
        // off-buffer pixels are dropped and do not dirty anything
        fb.draw_iter([Pixel(Point::new(-1, 9), Rgb565::WHITE)]).unwrap();
        assert_eq!(fb.take_dirty(), Some(1..7));
    }

    #[test]
    fn test_copy_rows_le() {
        let mut fb = VarFrameBuf::new(2, 2, Rgb565::BLACK);
        fb.draw_iter([Pixel(Point::new(1, 1), rgb565(0xF81F))]).unwrap();
        let mut out = vec![0u8; 2 * 2 * 2];
        fb.copy_rows_le(0..2, &mut out, 4);
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0x1F, 0xF8]);
    }
}
