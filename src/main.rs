/*
 *  main.rs
 *
 *  soundboard - press play
 *  (c) 2020-26 Stuart Hunter
 *
 *  Hardware wiring and the poll loop
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

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use log::{info, warn};
use tokio::signal::unix::{signal, SignalKind};

use soundboard::audio::RodioDecoder;
use soundboard::buttons::GpioButtons;
use soundboard::config::{self, ButtonWiring, Cli};
use soundboard::display::{DisplayDriver, FbDevDriver, GraphicsCanvas, Palette};
use soundboard::pacer::Pacer;
use soundboard::{App, FsDirectorySource, Inventory};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Waits for SIGINT, SIGTERM or SIGHUP and logs which one arrived.
async fn signal_handler() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

fn open_buttons(wiring: &ButtonWiring) -> Result<GpioButtons<CdevPin>> {
    let mut chip = Chip::new(&wiring.chip).with_context(|| format!("opening {}", wiring.chip.display()))?;
    let mut line = |offset: u32, label: &str| -> Result<CdevPin> {
        let handle = chip
            .get_line(offset)
            .and_then(|l| l.request(LineRequestFlags::INPUT, 0, "soundboard"))
            .with_context(|| format!("requesting {} button on line {}", label, offset))?;
        CdevPin::new(handle).with_context(|| format!("binding {} button", label))
    };
    let primary = line(wiring.primary, "primary")?;
    let secondary = line(wiring.secondary, "secondary")?;
    let advance = line(wiring.advance, "advance")?;
    info!(
        "Buttons on {} lines {}/{}/{}{}",
        wiring.chip.display(),
        wiring.primary,
        wiring.secondary,
        wiring.advance,
        if wiring.active_low { " (active low)" } else { "" }
    );
    Ok(GpioButtons::new(primary, secondary, advance, wiring.active_low))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        println!("{}", config::dump_config(&cfg)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} presses play", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let (width, height) = cfg.display_size();
    let mut driver = FbDevDriver::open(cfg.fb_device(), width, height, cfg.backlight())
        .context("opening framebuffer")?;
    driver.init().context("mapping framebuffer")?;
    if driver.capabilities().supports_brightness {
        if let Err(e) = driver.set_brightness(cfg.brightness()) {
            warn!("Cannot set brightness: {}", e);
        }
    }
    let canvas = GraphicsCanvas::new(driver);

    let buttons = open_buttons(&cfg.button_wiring())?;
    let decoder = RodioDecoder::new().context("opening audio output")?;
    let palette = match cfg.seed {
        Some(seed) => Palette::seeded(seed),
        None => Palette::from_entropy(),
    };

    let inventory = Inventory::new(FsDirectorySource, cfg.library_settings());
    let mut app = App::new(inventory, decoder, buttons, canvas, palette, cfg.app_settings(), Instant::now());
    let mut pacer = Pacer::new(cfg.tick(), Instant::now());

    tokio::select! {
        res = signal_handler() => {
            res?;
        }
        _ = async {
            loop {
                app.tick(Instant::now());
                tokio::time::sleep(pacer.wait(Instant::now())).await;
            }
        } => {}
    }

    app.shutdown();
    info!("Bye");
    Ok(())
}
