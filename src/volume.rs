/*
 *  volume.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Volume level and the timed on-screen volume overlay
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

use crate::constants::OVERLAY_DURATION;

/// Volume level plus overlay visibility.
///
/// The level is held in whole percent so repeated steps land exactly on the
/// bounds and the overlay label always matches the stored value.
#[derive(Debug, Clone)]
pub struct VolumeOverlay {
    percent: u8,
    duration: Duration,
    deadline: Option<Instant>,
}

impl VolumeOverlay {
    pub fn new(level: f32, duration: Duration) -> Self {
        Self { percent: to_percent(level), duration, deadline: None }
    }

    pub fn with_default_duration(level: f32) -> Self {
        Self::new(level, OVERLAY_DURATION)
    }

    /// Current level in [0, 1].
    pub fn level(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_visible(&self) -> bool {
        self.deadline.is_some()
    }

    /// Change the level by `delta`, show the overlay until `now + duration`
    /// and return the new level.
    pub fn bump(&mut self, delta: f32, now: Instant) -> f32 {
        let step = (delta * 100.0).round() as i32;
        let next = (i32::from(self.percent) + step).clamp(0, 100);
        self.percent = next as u8;
        self.deadline = Some(now + self.duration);
        debug!("Volume {}%", self.percent);
        self.level()
    }

    /// Hide the overlay once its deadline has passed. Returns true when it
    /// was hidden on this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now > deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

fn to_percent(level: f32) -> u8 {
    (level.clamp(0.0, 1.0) * 100.0).round() as u8
}
