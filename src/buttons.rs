/*
 *  buttons.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  GPIO push buttons sampled through embedded-hal input pins
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

use embedded_hal::digital::InputPin;
use log::warn;

use crate::input::{Button, ButtonTracker, InputDevice, InputError};

/// Three buttons on input pins, in `Button::ALL` order.
pub struct GpioButtons<P: InputPin> {
    pins: [P; 3],
    active_low: bool,
    tracker: ButtonTracker,
    failing: [bool; 3],
}

impl<P: InputPin> GpioButtons<P> {
    pub fn new(primary: P, secondary: P, advance: P, active_low: bool) -> Self {
        Self {
            pins: [primary, secondary, advance],
            active_low,
            tracker: ButtonTracker::new(),
            failing: [false; 3],
        }
    }

    fn read(&mut self, index: usize) -> Result<bool, InputError> {
        let high = self.pins[index]
            .is_high()
            .map_err(|e| InputError(format!("{:?}", e)))?;
        Ok(high != self.active_low)
    }
}

impl<P: InputPin> InputDevice for GpioButtons<P> {
    /// A pin that cannot be read counts as released. Each failure run is
    /// logged once.
    fn update(&mut self, now: Instant) {
        let mut levels = [false; 3];
        for (i, button) in Button::ALL.iter().enumerate() {
            match self.read(i) {
                Ok(down) => {
                    levels[i] = down;
                    self.failing[i] = false;
                }
                Err(e) => {
                    if !self.failing[i] {
                        warn!("{:?} button: {}", button, e);
                        self.failing[i] = true;
                    }
                }
            }
        }
        self.tracker.sample(levels, now);
    }

    fn is_down(&self, button: Button) -> bool {
        self.tracker.is_down(button)
    }

    fn held_for(&self, button: Button, duration: Duration) -> bool {
        self.tracker.held_for(button, duration)
    }

    fn was_pressed(&self, button: Button) -> bool {
        self.tracker.was_pressed(button)
    }

    fn was_released(&self, button: Button) -> bool {
        self.tracker.was_released(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Pin whose level is set from the test; `None` fails the read.
    #[derive(Clone)]
    struct TestPin(Rc<Cell<Option<bool>>>);

    impl ErrorType for TestPin {
        type Error = ErrorKind;
    }

    impl InputPin for TestPin {
        fn is_high(&mut self) -> Result<bool, ErrorKind> {
            self.0.get().ok_or(ErrorKind::Other)
        }

        fn is_low(&mut self) -> Result<bool, ErrorKind> {
            self.is_high().map(|h| !h)
        }
    }

    fn pins(level: bool) -> [Rc<Cell<Option<bool>>>; 3] {
        [
            Rc::new(Cell::new(Some(level))),
            Rc::new(Cell::new(Some(level))),
            Rc::new(Cell::new(Some(level))),
        ]
    }

    fn buttons(levels: &[Rc<Cell<Option<bool>>>; 3], active_low: bool) -> GpioButtons<TestPin> {
        GpioButtons::new(
            TestPin(levels[0].clone()),
            TestPin(levels[1].clone()),
            TestPin(levels[2].clone()),
            active_low,
        )
    }

    #[test]
    fn test_active_low_press() {
        let t0 = Instant::now();
        let levels = pins(true);
        let mut b = buttons(&levels, true);
        b.update(t0);
        assert!(!b.is_down(Button::Primary));

        levels[0].set(Some(false));
        b.update(t0 + Duration::from_millis(10));
        assert!(b.was_pressed(Button::Primary));
        assert!(!b.is_down(Button::Advance));
    }

    #[test]
    fn test_active_high_press() {
        let t0 = Instant::now();
        let levels = pins(false);
        let mut b = buttons(&levels, false);
        levels[2].set(Some(true));
        b.update(t0);
        assert!(b.was_pressed(Button::Advance));
    }

    #[test]
    fn test_read_error_counts_as_up() {
        let t0 = Instant::now();
        let levels = pins(true);
        let mut b = buttons(&levels, false);
        b.update(t0);
        assert!(b.is_down(Button::Secondary));
        levels[1].set(None);
        b.update(t0 + Duration::from_millis(10));
        assert!(!b.is_down(Button::Secondary));
        assert!(b.was_released(Button::Secondary));
    }
}
