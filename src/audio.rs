/*
 *  audio.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  rodio backed decoder: one sink per playing file
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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::playback::{DecodeError, Decoder, StepStatus};

/// Live playback of one file
pub struct RodioSession {
    sink: Sink,
}

/// Default output device; decoding runs on rodio's mixer thread.
pub struct RodioDecoder {
    // dropping the stream silences the device
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioDecoder {
    pub fn new() -> Result<Self, DecodeError> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| DecodeError::Output(e.to_string()))?;
        info!("Audio output opened");
        Ok(Self { _stream: stream, handle })
    }
}

impl Decoder for RodioDecoder {
    type Session = RodioSession;

    fn open(&mut self, path: &Path, gain: f32) -> Result<RodioSession, DecodeError> {
        let file = File::open(path)?;
        let source = rodio::Decoder::new(BufReader::new(file)).map_err(|e| DecodeError::Format(e.to_string()))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| DecodeError::Output(e.to_string()))?;
        sink.set_volume(gain);
        sink.append(source);
        debug!("Sink started for {}", path.display());
        Ok(RodioSession { sink })
    }

    fn step(&mut self, session: &mut RodioSession) -> StepStatus {
        if session.sink.empty() {
            StepStatus::Finished
        } else {
            StepStatus::Continue
        }
    }

    fn close(&mut self, session: RodioSession) {
        session.sink.stop();
    }

    fn set_gain(&mut self, session: Option<&mut RodioSession>, gain: f32) {
        if let Some(s) = session {
            s.sink.set_volume(gain);
        }
    }
}
