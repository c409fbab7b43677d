//! This module contains global constants used across the display and controller modules.

use std::time::Duration;

/// Default width of the panel in pixels (landscape).
pub const DISPLAY_WIDTH: u32 = 240;
/// Default height of the panel in pixels (landscape).
pub const DISPLAY_HEIGHT: u32 = 135;

/// Height of the path header line at the top of the screen.
pub const HEADER_HEIGHT: i32 = 16;
/// Height of one list row, including the highlight bar padding.
pub const ITEM_HEIGHT: i32 = 28;
/// Number of list rows visible at once.
pub const VISIBLE_ITEMS: usize = 4;
/// Left inset for all text.
pub const TEXT_INSET_X: i32 = 4;
/// Horizontal space reserved for the inset and the scroll indicator column.
pub const TEXT_RESERVED_WIDTH: u32 = 20;
/// Distance of the scroll indicator column from the right edge.
pub const INDICATOR_INSET_X: i32 = 16;
/// Y position of the "No folders" / "Empty" message.
pub const EMPTY_MESSAGE_Y: i32 = 50;

/// Height of the "PLAYING" bar at the bottom of the file view.
pub const PLAYING_BAR_HEIGHT: u32 = 16;

/// Volume overlay bar geometry.
pub const VOLUME_BAR_X: i32 = 10;
pub const VOLUME_BAR_HEIGHT: u32 = 14;
/// Distance of the volume bar from the bottom edge.
pub const VOLUME_BAR_BOTTOM_INSET: i32 = 30;

/// Default library root, folder names are read from here.
pub const DEFAULT_LIBRARY_ROOT: &str = "/data";
/// Folders starting with this prefix are hidden.
pub const DEFAULT_HIDDEN_PREFIX: &str = ".";
/// Recognized audio extension (without the dot, matched case-insensitively).
pub const DEFAULT_AUDIO_EXTENSION: &str = "ogg";

/// Poll loop period.
pub const TICK: Duration = Duration::from_millis(10);
/// Time between marquee steps.
pub const SCROLL_DELAY: Duration = Duration::from_millis(80);
/// Marquee hold at the start and at the end of the text.
pub const SCROLL_END_DELAY: Duration = Duration::from_millis(700);
/// A button held at least this long switches to volume repeat.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(500);
/// Time between volume steps while a button is held.
pub const VOLUME_REPEAT_DELAY: Duration = Duration::from_millis(150);
/// How long the volume overlay stays up after the last change.
pub const OVERLAY_DURATION: Duration = Duration::from_millis(1500);

/// Volume at startup.
pub const DEFAULT_VOLUME: f32 = 0.5;
/// Volume change per hold repeat.
pub const VOLUME_STEP: f32 = 0.05;

/// Backlight level applied at startup (0-255).
pub const DEFAULT_BRIGHTNESS: u8 = 128;
