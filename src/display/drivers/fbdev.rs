/*
 *  display/drivers/fbdev.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Linux framebuffer (RGB565) driver with sysfs backlight control
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

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};
use memmap2::{MmapMut, MmapOptions};

use crate::display::color::BACKGROUND;
use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

/// Geometry of the kernel framebuffer as reported by sysfs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FbGeometry {
    pub width: u32,
    pub height: u32,
    /// Bytes per line
    pub stride: usize,
    pub bits_per_pixel: u32,
}

impl FbGeometry {
    /// Read `/sys/class/graphics/<fbN>/{virtual_size,stride,bits_per_pixel}`.
    pub fn from_sysfs(device: &Path) -> Result<Self, DisplayError> {
        let name = device
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DisplayError::InitializationFailed(format!("bad device path {}", device.display())))?;
        let dir = PathBuf::from("/sys/class/graphics").join(name);
        let size = fs::read_to_string(dir.join("virtual_size"))?;
        let stride = fs::read_to_string(dir.join("stride"))?;
        let bpp = fs::read_to_string(dir.join("bits_per_pixel"))?;
        Self::parse(&size, &stride, &bpp)
    }

    pub fn parse(virtual_size: &str, stride: &str, bits_per_pixel: &str) -> Result<Self, DisplayError> {
        let bad = |what: &str, v: &str| DisplayError::InitializationFailed(format!("unreadable fb {}: {:?}", what, v.trim()));
        let (w, h) = virtual_size.trim().split_once(',').ok_or_else(|| bad("virtual_size", virtual_size))?;
        Ok(Self {
            width: w.trim().parse().map_err(|_| bad("width", w))?,
            height: h.trim().parse().map_err(|_| bad("height", h))?,
            stride: stride.trim().parse().map_err(|_| bad("stride", stride))?,
            bits_per_pixel: bits_per_pixel.trim().parse().map_err(|_| bad("bits_per_pixel", bits_per_pixel))?,
        })
    }
}

/// Brightness through a sysfs backlight node
#[derive(Debug, Clone)]
pub struct Backlight {
    path: PathBuf,
    max: u32,
}

impl Backlight {
    /// `path` is the `brightness` file; `max_brightness` next to it sets the scale.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let max = path
            .parent()
            .map(|dir| dir.join("max_brightness"))
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(255);
        Self { path, max }
    }

    /// Scale 0-255 onto the device range.
    pub fn level_for(&self, value: u8) -> u32 {
        (u32::from(value) * self.max + 127) / 255
    }

    pub fn set(&self, value: u8) -> Result<(), DisplayError> {
        fs::write(&self.path, self.level_for(value).to_string())?;
        Ok(())
    }
}

/// RGB565 panel behind `/dev/fbN`.
///
/// Drawing lands in an in-memory buffer; `flush` copies the dirty rows into
/// the mapped device memory.
pub struct FbDevDriver {
    framebuffer: VarFrameBuf,
    capabilities: DisplayCapabilities,
    device: PathBuf,
    stride: usize,
    mmap: Option<MmapMut>,
    backlight: Option<Backlight>,
}

impl FbDevDriver {
    /// Open `device`, drawing into a `width` x `height` area at its top left.
    pub fn open(device: impl Into<PathBuf>, width: u32, height: u32, backlight: Option<PathBuf>) -> Result<Self, DisplayError> {
        let device = device.into();
        let stride = match FbGeometry::from_sysfs(&device) {
            Ok(geo) => {
                if geo.bits_per_pixel != 16 {
                    return Err(DisplayError::InitializationFailed(format!(
                        "{} is {} bpp, only RGB565 is supported",
                        device.display(),
                        geo.bits_per_pixel
                    )));
                }
                if geo.width < width || geo.height < height {
                    return Err(DisplayError::InitializationFailed(format!(
                        "{} is {}x{}, smaller than {}x{}",
                        device.display(),
                        geo.width,
                        geo.height,
                        width,
                        height
                    )));
                }
                debug!("{}: {:?}", device.display(), geo);
                geo.stride
            }
            Err(e) => {
                debug!("No sysfs geometry for {} ({}), assuming packed {}x{}", device.display(), e, width, height);
                width as usize * 2
            }
        };

        Ok(Self {
            framebuffer: VarFrameBuf::new(width, height, BACKGROUND),
            capabilities: DisplayCapabilities { width, height, supports_brightness: backlight.is_some() },
            device,
            stride,
            mmap: None,
            backlight: backlight.map(Backlight::open),
        })
    }

    fn map_len(&self) -> usize {
        self.stride * self.capabilities.height as usize
    }
}

impl DisplayDriver for FbDevDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.device)
            .map_err(|e| DisplayError::InitializationFailed(format!("{}: {}", self.device.display(), e)))?;
        let mmap = unsafe { MmapOptions::new().len(self.map_len()).map_mut(&file)? };
        self.mmap = Some(mmap);
        self.framebuffer.invalidate();
        info!(
            "Framebuffer {} mapped, {}x{}",
            self.device.display(),
            self.capabilities.width,
            self.capabilities.height
        );
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        match &self.backlight {
            Some(b) => b.set(value),
            None => Err(DisplayError::UnsupportedOperation),
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let Some(mmap) = self.mmap.as_mut() else {
            return Err(DisplayError::Other("framebuffer not initialised".to_string()));
        };
        if let Some(rows) = self.framebuffer.take_dirty() {
            self.framebuffer.copy_rows_le(rows, &mut mmap[..], self.stride);
        }
        Ok(())
    }
}

impl DrawTarget for FbDevDriver {
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

impl OriginDimensions for FbDevDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}
