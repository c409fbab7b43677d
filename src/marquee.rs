/*
 *  marquee.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Horizontal auto-scroll of the selected row with a hold at both ends
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

use std::time::{Duration, Instant};

use crate::constants::{SCROLL_DELAY, SCROLL_END_DELAY};

/// Marquee timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarqueeTiming {
    /// Time between one-character steps.
    pub step: Duration,
    /// Hold before scrolling starts and again at the tail.
    pub hold: Duration,
}

impl Default for MarqueeTiming {
    fn default() -> Self {
        Self { step: SCROLL_DELAY, hold: SCROLL_END_DELAY }
    }
}

/// Animation phase of the selected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Text fits the row, nothing moves.
    Idle,
    /// Holding at offset 0 since the selection was made.
    Lead { since: Instant },
    /// Advancing one character per step.
    Scrolling { last_step: Instant },
    /// Holding at the tail before jumping back to the start.
    PausedAtEnd { since: Instant },
}

/// Single marquee for the current selection.
#[derive(Debug, Clone)]
pub struct Marquee {
    timing: MarqueeTiming,
    offset: usize,
    phase: Phase,
}

impl Marquee {
    pub fn new(timing: MarqueeTiming, now: Instant) -> Self {
        Self { timing, offset: 0, phase: Phase::Lead { since: now } }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Restart for a new selection made at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.offset = 0;
        self.phase = Phase::Lead { since: now };
    }

    /// Advance the animation. Returns true when the visible text changed and
    /// the selected row must be redrawn.
    pub fn tick(&mut self, now: Instant, text_len: usize, max_chars: usize) -> bool {
        if text_len <= max_chars {
            self.offset = 0;
            self.phase = Phase::Idle;
            return false;
        }
        let max_offset = text_len - max_chars;

        match self.phase {
            Phase::Idle => {
                // text changed from fitting to overflowing, start over
                self.phase = Phase::Lead { since: now };
                false
            }
            Phase::Lead { since } => {
                if now.saturating_duration_since(since) < self.timing.hold {
                    return false;
                }
                self.phase = Phase::Scrolling { last_step: now };
                self.step(now, max_offset)
            }
            Phase::Scrolling { last_step } => {
                if now.saturating_duration_since(last_step) < self.timing.step {
                    return false;
                }
                self.phase = Phase::Scrolling { last_step: now };
                self.step(now, max_offset)
            }
            Phase::PausedAtEnd { since } => {
                if now.saturating_duration_since(since) < self.timing.hold {
                    return false;
                }
                self.offset = 0;
                self.phase = Phase::Lead { since: now };
                true
            }
        }
    }

    fn step(&mut self, now: Instant, max_offset: usize) -> bool {
        if self.offset >= max_offset {
            self.phase = Phase::PausedAtEnd { since: now };
            return false;
        }
        self.offset += 1;
        true
    }
}

/// The `max_chars` wide window of `text` starting at `offset`, or the whole
/// text when it already fits. Counts characters, not bytes.
pub fn scrolled_substring(text: &str, max_chars: usize, offset: usize) -> &str {
    let len = text.chars().count();
    if len <= max_chars {
        return text;
    }
    let start = byte_index(text, offset.min(len));
    let end = byte_index(text, (offset + max_chars).min(len));
    &text[start..end]
}

/// Leading `max_chars` characters of `text`.
pub fn truncated(text: &str, max_chars: usize) -> &str {
    &text[..byte_index(text, max_chars)]
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(text.len())
}
