/*
 *  display/traits.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display driver abstraction
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

use crate::display::error::DisplayError;

/// What a panel can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCapabilities {
    pub width: u32,
    pub height: u32,
    /// A backlight is wired up
    pub supports_brightness: bool,
}

/// Lifecycle of an RGB565 panel. Pixels are drawn through the driver's
/// embedded-graphics `DrawTarget`.
pub trait DisplayDriver {
    fn capabilities(&self) -> &DisplayCapabilities;

    /// (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    fn init(&mut self) -> Result<(), DisplayError>;

    /// 0-255; `UnsupportedOperation` without a backlight
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Push whatever changed since the last flush
    fn flush(&mut self) -> Result<(), DisplayError>;
}
