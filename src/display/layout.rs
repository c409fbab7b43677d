/*
 *  display/layout.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen geometry of the browser, status bar and volume overlay
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

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::constants::{
    EMPTY_MESSAGE_Y, HEADER_HEIGHT, INDICATOR_INSET_X, ITEM_HEIGHT, PLAYING_BAR_HEIGHT, TEXT_INSET_X,
    TEXT_RESERVED_WIDTH, VISIBLE_ITEMS, VOLUME_BAR_BOTTOM_INSET, VOLUME_BAR_HEIGHT, VOLUME_BAR_X,
};
use crate::display::canvas::TextSize;

/// Pixel geometry for one display size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// Rows shown at once
    pub visible_items: usize,
    /// Characters that fit in a list row
    pub max_chars: usize,
}

impl Layout {
    pub fn for_display(width: u32, height: u32) -> Self {
        let max_chars = (width.saturating_sub(TEXT_RESERVED_WIDTH) / TextSize::Large.char_width()) as usize;
        Self { width, height, visible_items: VISIBLE_ITEMS, max_chars }
    }

    pub fn header_origin(&self) -> Point {
        Point::new(TEXT_INSET_X, 2)
    }

    /// Top of the first list row
    pub fn list_top(&self) -> i32 {
        HEADER_HEIGHT + 4
    }

    /// Text origin of visible row `row`
    pub fn row_y(&self, row: usize) -> i32 {
        self.list_top() + row as i32 * ITEM_HEIGHT
    }

    pub fn row_text_origin(&self, row: usize) -> Point {
        Point::new(TEXT_INSET_X, self.row_y(row))
    }

    /// Full-width highlight behind the selected row
    pub fn highlight_rect(&self, row: usize) -> Rectangle {
        Rectangle::new(Point::new(0, self.row_y(row) - 2), Size::new(self.width, ITEM_HEIGHT as u32))
    }

    /// Text area of a row, cleared by the partial redraw
    pub fn row_text_rect(&self, row: usize) -> Rectangle {
        Rectangle::new(
            Point::new(TEXT_INSET_X, self.row_y(row) - 2),
            Size::new(self.width.saturating_sub(TEXT_RESERVED_WIDTH), ITEM_HEIGHT as u32),
        )
    }

    pub fn empty_message_origin(&self) -> Point {
        Point::new(TEXT_INSET_X, EMPTY_MESSAGE_Y)
    }

    pub fn scroll_up_origin(&self) -> Point {
        Point::new(self.width as i32 - INDICATOR_INSET_X, self.row_y(0))
    }

    pub fn scroll_down_origin(&self) -> Point {
        Point::new(self.width as i32 - INDICATOR_INSET_X, self.row_y(self.visible_items.saturating_sub(1)))
    }

    pub fn playing_bar(&self) -> Rectangle {
        Rectangle::new(
            Point::new(0, self.height as i32 - PLAYING_BAR_HEIGHT as i32),
            Size::new(self.width, PLAYING_BAR_HEIGHT),
        )
    }

    pub fn playing_label_origin(&self) -> Point {
        Point::new(TEXT_INSET_X, self.height as i32 - PLAYING_BAR_HEIGHT as i32 + 2)
    }

    /// Outline of the volume bar
    pub fn volume_bar(&self) -> Rectangle {
        Rectangle::new(
            Point::new(VOLUME_BAR_X, self.height as i32 - VOLUME_BAR_BOTTOM_INSET),
            Size::new(self.width.saturating_sub(TEXT_RESERVED_WIDTH), VOLUME_BAR_HEIGHT),
        )
    }

    /// Box cleared behind the overlay, bar plus label
    pub fn volume_box(&self) -> Rectangle {
        let bar = self.volume_bar();
        Rectangle::new(bar.top_left - Point::new(4, 18), bar.size + Size::new(8, 24))
    }

    pub fn volume_label_origin(&self) -> Point {
        self.volume_bar().top_left - Point::new(0, 16)
    }

    /// Filled part of the bar for `level` in [0, 1], inset by one pixel
    pub fn volume_fill(&self, level: f32) -> Rectangle {
        let bar = self.volume_bar();
        let fill = (bar.size.width as f32 * level.clamp(0.0, 1.0)) as u32;
        Rectangle::new(
            bar.top_left + Point::new(1, 1),
            Size::new(fill.saturating_sub(2), bar.size.height.saturating_sub(2)),
        )
    }
}
