/*
 *  lib.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Folder/file soundboard: browse, play, scroll, adjust volume
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

pub mod app;
#[cfg(feature = "audio")]
pub mod audio;
pub mod buttons;
pub mod config;
pub mod constants;
pub mod display;
pub mod input;
pub mod inventory;
pub mod marquee;
pub mod pacer;
pub mod playback;
pub mod selection;
pub mod vframebuf;
pub mod volume;

pub use app::{App, AppSettings};
pub use input::{Button, ButtonTracker, InputDevice, InputEvent};
pub use inventory::{DirEntry, DirectorySource, FsDirectorySource, Inventory, LibrarySettings};
pub use playback::{DecodeError, Decoder, PlaybackController, StepStatus};
pub use selection::{SelectionChange, SelectionModel, View};
