/*
 *  display/drivers/mock.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display driver for testing without hardware
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

use std::sync::{Arc, Mutex};

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::color::BACKGROUND;
use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

/// In-memory panel for tests; counters live behind a shared handle so they
/// stay readable after the driver moves into a canvas.
#[derive(Debug, Clone)]
pub struct MockDriver {
    framebuffer: VarFrameBuf,
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

#[derive(Debug, Default)]
pub struct MockDriverState {
    pub init_count: usize,
    pub flush_count: usize,
    /// Dirty rows taken by the last flush, `None` when nothing changed
    pub last_flushed_rows: Option<(usize, usize)>,
    pub last_brightness: Option<u8>,
    /// Make the next flushes fail
    pub simulate_flush_failure: bool,
}

impl MockDriver {
    pub fn new_with_size(width: u32, height: u32) -> Self {
        Self {
            framebuffer: VarFrameBuf::new(width, height, BACKGROUND),
            capabilities: DisplayCapabilities { width, height, supports_brightness: true },
            state: Arc::default(),
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        self.framebuffer.pixel(x as usize, y as usize)
    }

    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    /// Pixels that differ from `background`
    pub fn count_non_background(&self, background: Rgb565) -> usize {
        self.framebuffer.as_slice().iter().filter(|&&p| p != background).count()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockDriverState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state)
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.with_state(|s| s.init_count += 1);
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.with_state(|s| s.last_brightness = Some(value));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.with_state(|s| s.simulate_flush_failure) {
            return Err(DisplayError::Other("simulated flush failure".to_string()));
        }
        let rows = self.framebuffer.take_dirty().map(|r| (r.start, r.end));
        self.with_state(|s| {
            s.flush_count += 1;
            s.last_flushed_rows = rows;
        });
        Ok(())
    }
}

impl DrawTarget for MockDriver {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color)
    }
}

impl OriginDimensions for MockDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_starts_blank() {
        let driver = MockDriver::new_with_size(240, 135);
        assert_eq!(driver.dimensions(), (240, 135));
        assert_eq!(driver.count_non_background(BACKGROUND), 0);
    }

    #[test]
    fn test_counts_init_and_brightness() {
        let mut driver = MockDriver::new_with_size(240, 135);
        let state = driver.state();
        driver.init().unwrap();
        driver.set_brightness(128).unwrap();
        let s = state.lock().unwrap();
        assert_eq!(s.init_count, 1);
        assert_eq!(s.last_brightness, Some(128));
    }

    #[test]
    fn test_line_lands_in_framebuffer() {
        let mut driver = MockDriver::new_with_size(240, 135);
        Line::new(Point::new(0, 0), Point::new(10, 10))
            .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
            .draw(&mut driver)
            .unwrap();
        assert_eq!(driver.get_pixel(0, 0), Some(Rgb565::WHITE));
        assert_eq!(driver.get_pixel(10, 10), Some(Rgb565::WHITE));
        assert_eq!(driver.get_pixel(10, 0), Some(BACKGROUND));
    }

    #[test]
    fn test_flush_reports_dirty_rows_once() {
        let mut driver = MockDriver::new_with_size(240, 135);
        Rectangle::new(Point::new(4, 18), Size::new(220, 28))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut driver)
            .unwrap();
        driver.flush().unwrap();
        assert_eq!(driver.state().lock().unwrap().last_flushed_rows, Some((18, 46)));
        driver.flush().unwrap();
        assert_eq!(driver.state().lock().unwrap().last_flushed_rows, None);
        assert_eq!(driver.state().lock().unwrap().flush_count, 2);
    }

    #[test]
    fn test_simulated_flush_failure() {
        let mut driver = MockDriver::new_with_size(240, 135);
        driver.state().lock().unwrap().simulate_flush_failure = true;
        assert!(driver.flush().is_err());
        driver.state().lock().unwrap().simulate_flush_failure = false;
        assert!(driver.flush().is_ok());
    }
}
