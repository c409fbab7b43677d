/*
 *  input.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Button edge/hold tracking and classification into UI events
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

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::constants::{HOLD_THRESHOLD, VOLUME_REPEAT_DELAY};

#[derive(Debug, Error)]
#[error("button input error: {0}")]
pub struct InputError(pub String);

/// Logical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Select/play, hold for volume up.
    Primary,
    /// Previous/back, hold for volume down.
    Secondary,
    /// Next entry.
    Advance,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Primary, Button::Secondary, Button::Advance];

    fn index(self) -> usize {
        match self {
            Button::Primary => 0,
            Button::Secondary => 1,
            Button::Advance => 2,
        }
    }
}

/// Per-tick button state.
pub trait InputDevice {
    /// Sample the hardware. Called once at the start of every tick.
    fn update(&mut self, now: Instant);

    fn is_down(&self, button: Button) -> bool;

    /// Down continuously for at least `duration`.
    fn held_for(&self, button: Button, duration: Duration) -> bool;

    /// Went down on the latest update.
    fn was_pressed(&self, button: Button) -> bool;

    /// Went up on the latest update.
    fn was_released(&self, button: Button) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    down: bool,
    down_since: Option<Instant>,
    pressed: bool,
    released: bool,
}

/// Edge and hold bookkeeping from raw "is down" levels.
///
/// Used directly as an `InputDevice`, levels are latched with `set_levels`
/// and take effect on the next `update`. Levels persist until changed, so a
/// tick without new levels reports no edges.
#[derive(Debug, Clone)]
pub struct ButtonTracker {
    buttons: [ButtonState; 3],
    now: Option<Instant>,
    pending: Option<[bool; 3]>,
}

impl Default for ButtonTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self { buttons: [ButtonState::default(); 3], now: None, pending: None }
    }

    /// Latch levels for the next `update`, in `Button::ALL` order.
    pub fn set_levels(&mut self, levels: [bool; 3]) {
        self.pending = Some(levels);
    }

    fn levels(&self) -> [bool; 3] {
        self.buttons.map(|b| b.down)
    }

    /// Feed the levels sampled at `now`, in `Button::ALL` order.
    pub fn sample(&mut self, levels: [bool; 3], now: Instant) {
        self.now = Some(now);
        for (state, down) in self.buttons.iter_mut().zip(levels) {
            state.pressed = down && !state.down;
            state.released = !down && state.down;
            if state.pressed {
                state.down_since = Some(now);
            } else if !down {
                state.down_since = None;
            }
            state.down = down;
        }
    }

    fn state(&self, button: Button) -> &ButtonState {
        &self.buttons[button.index()]
    }
}

impl InputDevice for ButtonTracker {
    /// Apply latched levels, or the previous ones again.
    fn update(&mut self, now: Instant) {
        let levels = self.pending.take().unwrap_or_else(|| self.levels());
        self.sample(levels, now);
    }

    fn is_down(&self, button: Button) -> bool {
        self.state(button).down
    }

    fn held_for(&self, button: Button, duration: Duration) -> bool {
        match (self.state(button).down_since, self.now) {
            (Some(since), Some(now)) => now.saturating_duration_since(since) >= duration,
            _ => false,
        }
    }

    fn was_pressed(&self, button: Button) -> bool {
        self.state(button).pressed
    }

    fn was_released(&self, button: Button) -> bool {
        self.state(button).released
    }
}

/// What the buttons asked for on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    VolumeUp,
    VolumeDown,
    /// Short press of the primary button.
    Select,
    /// Short press of the secondary button.
    Back,
    /// Press of the advance button.
    Next,
}

/// Hold/repeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTiming {
    pub threshold: Duration,
    pub repeat: Duration,
}

impl Default for HoldTiming {
    fn default() -> Self {
        Self { threshold: HOLD_THRESHOLD, repeat: VOLUME_REPEAT_DELAY }
    }
}

/// Turns button state into events.
///
/// A press that turned into a volume hold does not also fire its short-press
/// action on release. Both volume buttons share one repeat timer.
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    timing: HoldTiming,
    primary_held: bool,
    secondary_held: bool,
    last_volume_change: Option<Instant>,
}

impl InputDispatcher {
    pub fn new(timing: HoldTiming) -> Self {
        Self { timing, primary_held: false, secondary_held: false, last_volume_change: None }
    }

    /// Classify the current state of `input`. Events come out in a fixed
    /// order: volume repeats, then short presses, then advance.
    pub fn dispatch<I: InputDevice + ?Sized>(&mut self, input: &I, now: Instant) -> ArrayVec<InputEvent, 5> {
        let mut events = ArrayVec::new();

        if input.is_down(Button::Primary) && input.held_for(Button::Primary, self.timing.threshold) {
            self.primary_held = true;
            if self.volume_repeat_due(now) {
                events.push(InputEvent::VolumeUp);
            }
        }
        if input.is_down(Button::Secondary) && input.held_for(Button::Secondary, self.timing.threshold) {
            self.secondary_held = true;
            if self.volume_repeat_due(now) {
                events.push(InputEvent::VolumeDown);
            }
        }

        if input.was_released(Button::Primary) {
            if !self.primary_held {
                events.push(InputEvent::Select);
            }
            self.primary_held = false;
        }
        if input.was_released(Button::Secondary) {
            if !self.secondary_held {
                events.push(InputEvent::Back);
            }
            self.secondary_held = false;
        }

        if input.was_pressed(Button::Advance) {
            events.push(InputEvent::Next);
        }
        events
    }

    fn volume_repeat_due(&mut self, now: Instant) -> bool {
        let due = match self.last_volume_change {
            Some(last) => now.saturating_duration_since(last) > self.timing.repeat,
            None => true,
        };
        if due {
            self.last_volume_change = Some(now);
        }
        due
    }
}
