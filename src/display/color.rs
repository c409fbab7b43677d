/*
 *  display/color.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed UI colours and the randomised selection palette
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

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build an `Rgb565` from its packed 16-bit value
pub const fn rgb565(raw: u16) -> Rgb565 {
    Rgb565::new(((raw >> 11) & 0x1f) as u8, ((raw >> 5) & 0x3f) as u8, (raw & 0x1f) as u8)
}

/// Packed 16-bit value of `color`
pub fn raw565(color: Rgb565) -> u16 {
    RawU16::from(color).into_inner()
}

pub const BACKGROUND: Rgb565 = rgb565(0x0000);
pub const HEADER: Rgb565 = rgb565(0xF81F);
pub const NORMAL_TEXT: Rgb565 = rgb565(0xC618);
pub const PLAYING: Rgb565 = rgb565(0x07E0);
pub const SCROLL_MARK: Rgb565 = rgb565(0x8410);
pub const SPLASH_TEXT: Rgb565 = Rgb565::WHITE;

/// Selection foreground candidates
pub const RAINBOW: [Rgb565; 12] = [
    rgb565(0xF800), // red
    rgb565(0xFD20), // orange
    rgb565(0xFFE0), // yellow
    rgb565(0x07E0), // green
    rgb565(0x07FF), // cyan
    rgb565(0x001F), // blue
    rgb565(0x780F), // purple
    rgb565(0xF81F), // magenta
    rgb565(0xFBE0), // gold
    rgb565(0x87FF), // light cyan
    rgb565(0xFC9F), // pink
    rgb565(0xAFE5), // mint
];

/// Quarter-intensity version of `color`
pub fn darker(color: Rgb565) -> Rgb565 {
    Rgb565::new(color.r() >> 2, color.g() >> 2, color.b() >> 2)
}

/// Foreground/background pair of the selected row. Always changed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionColors {
    pub foreground: Rgb565,
    pub background: Rgb565,
}

impl SelectionColors {
    pub fn from_foreground(foreground: Rgb565) -> Self {
        Self { foreground, background: darker(foreground) }
    }
}

impl Default for SelectionColors {
    /// cyan on dark purple until the first shuffle
    fn default() -> Self {
        Self { foreground: rgb565(0x07FF), background: rgb565(0x4810) }
    }
}

/// Seedable picker for the selection colours.
#[derive(Debug, Clone)]
pub struct Palette {
    rng: StdRng,
    current: SelectionColors,
}

impl Palette {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), current: SelectionColors::default() }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_os_rng(), current: SelectionColors::default() }
    }

    pub fn current(&self) -> SelectionColors {
        self.current
    }

    /// Pick a new rainbow colour for the selection and return it.
    pub fn shuffle(&mut self) -> SelectionColors {
        let idx = self.rng.random_range(0..RAINBOW.len());
        self.current = SelectionColors::from_foreground(RAINBOW[idx]);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_round_trip() {
        for raw in [0x0000, 0xF81F, 0x07E0, 0xAFE5, 0xFFFF] {
            assert_eq!(raw565(rgb565(raw)), raw);
        }
    }

    #[test]
    fn test_darker_shifts_each_channel() {
        // red 0x1f -> 0x07, green/blue stay 0
        assert_eq!(raw565(darker(rgb565(0xF800))), 0x3800);
        // magenta: r 31 -> 7, b 31 -> 7
        assert_eq!(raw565(darker(rgb565(0xF81F))), 0x3807);
        // white: 31,63,31 -> 7,15,7
        assert_eq!(raw565(darker(rgb565(0xFFFF))), (7 << 11) | (15 << 5) | 7);
    }

    #[test]
    fn test_seeded_palette_is_deterministic() {
        let mut a = Palette::seeded(42);
        let mut b = Palette::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.shuffle(), b.shuffle());
        }
    }

    #[test]
    fn test_shuffle_stays_in_rainbow() {
        let mut p = Palette::seeded(7);
        for _ in 0..50 {
            let c = p.shuffle();
            assert!(RAINBOW.contains(&c.foreground));
            assert_eq!(c.background, darker(c.foreground));
            assert_eq!(p.current(), c);
        }
    }
}
