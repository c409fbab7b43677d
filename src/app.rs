/*
 *  app.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Application state and the per-tick controller
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

use log::{error, info};

use crate::constants::{DEFAULT_VOLUME, OVERLAY_DURATION, VOLUME_STEP};
use crate::display::canvas::Canvas;
use crate::display::color::{Palette, SelectionColors};
use crate::display::error::DisplayError;
use crate::display::layout::Layout;
use crate::display::render::{Frame, Renderer};
use crate::input::{HoldTiming, InputDevice, InputDispatcher, InputEvent};
use crate::inventory::{DirectorySource, Inventory};
use crate::marquee::{Marquee, MarqueeTiming};
use crate::playback::{Decoder, PlaybackController};
use crate::selection::{SelectionChange, SelectionModel, View};
use crate::volume::VolumeOverlay;

/// Behaviour knobs of the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppSettings {
    pub marquee: MarqueeTiming,
    pub hold: HoldTiming,
    pub overlay: Duration,
    pub initial_volume: f32,
    pub volume_step: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            marquee: MarqueeTiming::default(),
            hold: HoldTiming::default(),
            overlay: OVERLAY_DURATION,
            initial_volume: DEFAULT_VOLUME,
            volume_step: VOLUME_STEP,
        }
    }
}

/// Pending screen work, collected during a tick and drawn once at its end
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Redraw {
    full: bool,
    row: bool,
    overlay: bool,
}

impl Redraw {
    fn any(&self) -> bool {
        self.full || self.row || self.overlay
    }
}

/// All controller state, driven by `tick` from one loop.
pub struct App<F, D, I, C>
where
    F: DirectorySource,
    D: Decoder,
    I: InputDevice,
    C: Canvas,
{
    inventory: Inventory<F>,
    selection: SelectionModel,
    marquee: Marquee,
    playback: PlaybackController<D>,
    volume: VolumeOverlay,
    dispatcher: InputDispatcher,
    input: I,
    palette: Palette,
    renderer: Renderer,
    canvas: C,
    volume_step: f32,
    redraw: Redraw,
}

impl<F, D, I, C> App<F, D, I, C>
where
    F: DirectorySource,
    D: Decoder,
    I: InputDevice,
    C: Canvas,
{
    /// Show the splash, scan the library and queue the first frame.
    pub fn new(
        inventory: Inventory<F>,
        decoder: D,
        input: I,
        mut canvas: C,
        mut palette: Palette,
        settings: AppSettings,
        now: Instant,
    ) -> Self {
        let renderer = Renderer::new(Layout::for_display(canvas.width(), canvas.height()));
        if let Err(e) = renderer.splash(&mut canvas).and_then(|_| canvas.flush()) {
            error!("Splash failed: {}", e);
        }

        let folders = inventory.list_folders();
        info!("{} folders under {}", folders.len(), inventory.settings().root.display());
        let selection = SelectionModel::new(folders, renderer.layout().visible_items);
        let volume = VolumeOverlay::new(settings.initial_volume, settings.overlay);
        palette.shuffle();

        Self {
            inventory,
            selection,
            marquee: Marquee::new(settings.marquee, now),
            playback: PlaybackController::new(decoder, volume.level()),
            volume,
            dispatcher: InputDispatcher::new(settings.hold),
            input,
            palette,
            renderer,
            canvas,
            volume_step: settings.volume_step,
            redraw: Redraw { full: true, ..Redraw::default() },
        }
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn playback(&self) -> &PlaybackController<D> {
        &self.playback
    }

    pub fn volume(&self) -> &VolumeOverlay {
        &self.volume
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    pub fn colors(&self) -> SelectionColors {
        self.palette.current()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// One loop iteration. The order is fixed: input, playback, overlay
    /// expiry, marquee, button events, then drawing.
    pub fn tick(&mut self, now: Instant) {
        self.input.update(now);

        if self.playback.tick() {
            self.redraw.full = true;
        }

        if self.volume.tick(now) {
            self.redraw.full = true;
        }

        if !self.volume.is_visible() {
            let text_len = self.selected_name().map(|n| n.chars().count()).unwrap_or(0);
            if self.marquee.tick(now, text_len, self.renderer.layout().max_chars) {
                self.redraw.row = true;
            }
        }

        for event in self.dispatcher.dispatch(&self.input, now) {
            self.handle(event, now);
        }

        self.render();
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::VolumeUp => self.adjust_volume(self.volume_step, now),
            InputEvent::VolumeDown => self.adjust_volume(-self.volume_step, now),
            InputEvent::Select => match self.selection.view() {
                View::Folders => {
                    let inventory = &self.inventory;
                    let change = self.selection.enter(|folder| inventory.list_files(folder));
                    self.selection_changed(change, now);
                }
                View::Files => self.play_selected(),
            },
            InputEvent::Back => {
                let change = self.selection.move_previous();
                self.selection_changed(change, now);
            }
            InputEvent::Next => {
                let change = self.selection.move_next();
                self.selection_changed(change, now);
            }
        }
    }

    /// Stop playback and blank the screen.
    pub fn shutdown(&mut self) {
        self.playback.stop();
        if let Err(e) = self.renderer.blank(&mut self.canvas).and_then(|_| self.canvas.flush()) {
            error!("Blanking display failed: {}", e);
        }
    }

    fn adjust_volume(&mut self, delta: f32, now: Instant) {
        let level = self.volume.bump(delta, now);
        self.playback.set_gain(level);
        self.redraw.overlay = true;
    }

    fn play_selected(&mut self) {
        let (Some(folder), Some(file)) = (self.selection.active_folder(), self.selection.selected()) else {
            return;
        };
        let path = self.inventory.file_path(folder, file);
        // an unplayable file leaves the controller idle, already logged
        let _ = self.playback.play(&path);
        self.redraw.full = true;
    }

    fn selection_changed(&mut self, change: SelectionChange, now: Instant) {
        if !change.changed() {
            return;
        }
        self.marquee.reset(now);
        self.palette.shuffle();
        self.redraw.full = true;
    }

    fn selected_name(&self) -> Option<&str> {
        let name = self.selection.selected()?;
        Some(match self.selection.view() {
            View::Folders => name,
            View::Files => self.inventory.display_name(name),
        })
    }

    fn render(&mut self) {
        let redraw = std::mem::take(&mut self.redraw);
        if !redraw.any() {
            return;
        }

        let scroll_offset = self.selection.scroll_offset();
        let selection = &self.selection;
        let inventory = &self.inventory;
        let names: Vec<&str> = match selection.view() {
            View::Folders => selection.folders().iter().map(String::as_str).collect(),
            View::Files => selection.files().iter().map(|f| inventory.display_name(f)).collect(),
        };
        let frame = Frame {
            view: selection.view(),
            folder: selection.active_folder(),
            names,
            cursor: selection.cursor(),
            scroll_offset,
            marquee_offset: self.marquee.offset(),
            colors: self.palette.current(),
            playing: self.playback.is_playing(),
        };

        let result = draw(&self.renderer, &mut self.canvas, &frame, redraw, &self.volume);
        if let Err(e) = result {
            error!("Render failed: {}", e);
        }
    }
}

fn draw<C: Canvas>(
    renderer: &Renderer,
    canvas: &mut C,
    frame: &Frame<'_>,
    redraw: Redraw,
    volume: &VolumeOverlay,
) -> Result<(), DisplayError> {
    if redraw.full {
        renderer.full(canvas, frame)?;
        // keep the overlay on top while it is still up
        if volume.is_visible() {
            renderer.volume_overlay(canvas, volume.percent(), frame.colors)?;
        }
    } else {
        if redraw.row {
            renderer.selected_row(canvas, frame)?;
        }
        if redraw.overlay {
            renderer.volume_overlay(canvas, volume.percent(), frame.colors)?;
        }
    }
    canvas.flush()
}
