/*
 *  display/mod.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem: drivers, canvas, layout and render policy
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod color;

// Drawing surface and what goes on it
pub mod canvas;
pub mod layout;
pub mod render;

pub mod drivers;

// Re-exports for convenience
pub use traits::{DisplayDriver, DisplayCapabilities};
pub use error::DisplayError;
pub use canvas::{Canvas, DrawOp, GraphicsCanvas, RecordingCanvas, TextSize};
pub use color::{Palette, SelectionColors};
pub use layout::Layout;
pub use render::{Frame, Renderer};
pub use drivers::fbdev::FbDevDriver;
