/*
 *  pacer.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-period loop pacing
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

use log::debug;

/// Keeps the poll loop on a fixed period regardless of how long a tick took.
pub struct Pacer {
    next_deadline: Instant,
    period: Duration,
    overruns: u64,
}

impl Pacer {
    pub fn new(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self { next_deadline: now + period, period, overruns: 0 }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks that finished after their deadline
    #[inline]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// How long to sleep before the next tick; also schedules the one after.
    /// A tick that ran past its deadline restarts the schedule from `now`.
    pub fn wait(&mut self, now: Instant) -> Duration {
        if now >= self.next_deadline {
            self.overruns += 1;
            if self.overruns.is_power_of_two() {
                debug!("Tick overrun by {:?} ({} so far)", now - self.next_deadline, self.overruns);
            }
            self.next_deadline = now + self.period;
            return Duration::ZERO;
        }
        let wait = self.next_deadline - now;
        self.next_deadline += self.period;
        wait
    }
}
