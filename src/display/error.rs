/*
 *  display/error.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error type for the display subsystem
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

use thiserror::Error;

/// Errors from the panel driver and the canvas over it
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display init failed: {0}")]
    InitializationFailed(String),

    /// framebuffer device or sysfs backlight
    #[error("display I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("not supported by this panel")]
    UnsupportedOperation,

    #[error("draw failed: {0}")]
    DrawingError(String),

    #[error("{0}")]
    Other(String),
}
