/*
 *  playback.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Single-flight decode session lifecycle and output gain
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

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;

/// Errors reported by a decoder backend.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open audio file: {0}")]
    Open(#[from] std::io::Error),
    #[error("unsupported or corrupt audio data: {0}")]
    Format(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Outcome of one unit of decode work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Continue,
    Finished,
}

/// Opaque decode/output pipeline.
pub trait Decoder {
    /// One live decode of one file.
    type Session;

    /// Open `path` and start feeding the output at `gain`.
    fn open(&mut self, path: &Path, gain: f32) -> Result<Self::Session, DecodeError>;

    /// Do one unit of work without blocking.
    fn step(&mut self, session: &mut Self::Session) -> StepStatus;

    /// Stop the session and release its file and decoder handles.
    fn close(&mut self, session: Self::Session);

    /// Apply `gain` to the output, and to `session` when one is live.
    fn set_gain(&mut self, session: Option<&mut Self::Session>, gain: f32);
}

/// Owns the only decode session.
pub struct PlaybackController<D: Decoder> {
    decoder: D,
    session: Option<D::Session>,
    current: Option<PathBuf>,
    gain: f32,
}

impl<D: Decoder> PlaybackController<D> {
    pub fn new(mut decoder: D, gain: f32) -> Self {
        let gain = gain.clamp(0.0, 1.0);
        decoder.set_gain(None, gain);
        Self { decoder, session: None, current: None, gain }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Start `path`, replacing whatever is playing. A file that cannot be
    /// opened leaves the controller idle.
    pub fn play(&mut self, path: &Path) -> Result<(), DecodeError> {
        if let Some(old) = self.session.take() {
            info!("Replacing {}", self.describe_current());
            self.decoder.close(old);
        }
        self.current = None;

        match self.decoder.open(path, self.gain) {
            Ok(session) => {
                info!("Playing {}", path.display());
                self.session = Some(session);
                self.current = Some(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                warn!("Cannot play {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Advance the live session. Returns true when it finished on this tick.
    pub fn tick(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match self.decoder.step(session) {
            StepStatus::Continue => false,
            StepStatus::Finished => {
                info!("Finished {}", self.describe_current());
                if let Some(done) = self.session.take() {
                    self.decoder.close(done);
                }
                self.current = None;
                true
            }
        }
    }

    /// Clamp `level` to [0, 1] and apply it right away.
    pub fn set_gain(&mut self, level: f32) {
        self.gain = level.clamp(0.0, 1.0);
        debug!("Output gain {:.2}", self.gain);
        self.decoder.set_gain(self.session.as_mut(), self.gain);
    }

    /// Close the live session, if any.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Stopping {}", self.describe_current());
            self.decoder.close(session);
        }
        self.current = None;
    }

    fn describe_current(&self) -> String {
        self.current
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string())
    }
}

impl<D: Decoder> Drop for PlaybackController<D> {
    fn drop(&mut self) {
        self.stop();
    }
}
