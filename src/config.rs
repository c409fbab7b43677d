use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

use crate::app::AppSettings;
use crate::constants::{
    DEFAULT_AUDIO_EXTENSION, DEFAULT_BRIGHTNESS, DEFAULT_HIDDEN_PREFIX, DEFAULT_LIBRARY_ROOT, DEFAULT_VOLUME,
    DISPLAY_HEIGHT, DISPLAY_WIDTH, HOLD_THRESHOLD, OVERLAY_DURATION, SCROLL_DELAY, SCROLL_END_DELAY, TICK,
    VOLUME_REPEAT_DELAY, VOLUME_STEP,
};
use crate::input::HoldTiming;
use crate::inventory::LibrarySettings;
use crate::marquee::MarqueeTiming;

pub const DEFAULT_FB_DEVICE: &str = "/dev/fb0";
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";
pub const DEFAULT_PRIMARY_LINE: u32 = 17;
pub const DEFAULT_SECONDARY_LINE: u32 = 27;
pub const DEFAULT_ADVANCE_LINE: u32 = 22;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level configuration. Every field is optional so layers merge cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>, // e.g., "info" | "debug"
    /// selection colour RNG seed, entropy when absent
    pub seed: Option<u64>,
    pub library: Option<LibraryConfig>,
    pub display: Option<DisplayConfig>,
    pub timing: Option<TimingConfig>,
    pub audio: Option<AudioConfig>,
    pub buttons: Option<ButtonsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LibraryConfig {
    pub root: Option<PathBuf>,
    pub hidden_prefix: Option<String>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub device: Option<PathBuf>,    // e.g. /dev/fb1
    pub backlight: Option<PathBuf>, // sysfs brightness file
    pub brightness: Option<u8>,     // 0-255
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimingConfig {
    pub tick_ms: Option<u64>,
    pub scroll_delay_ms: Option<u64>,
    pub scroll_end_delay_ms: Option<u64>,
    pub hold_threshold_ms: Option<u64>,
    pub volume_repeat_ms: Option<u64>,
    pub overlay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AudioConfig {
    pub initial_volume: Option<f32>,
    pub volume_step: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ButtonsConfig {
    pub chip: Option<PathBuf>,
    pub primary: Option<u32>, // line offsets on the chip
    pub secondary: Option<u32>,
    pub advance: Option<u32>,
    pub active_low: Option<bool>,
}

/// Resolved button wiring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonWiring {
    pub chip: PathBuf,
    pub primary: u32,
    pub secondary: u32,
    pub advance: u32,
    pub active_low: bool,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "soundboard", about = "Folder/file soundboard", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// debug logging, wins over --log-level
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Library root holding one folder per board
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,
    #[arg(long)]
    pub extension: Option<String>,
    /// Initial volume 0.0-1.0
    #[arg(long)]
    pub volume: Option<f32>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub fb_device: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!("Config file not found: {}", p.display())));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    normalize(&mut cfg);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Pretty YAML of the effective config.
pub fn dump_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(cfg)?)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/soundboard/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/soundboard/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/soundboard.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["soundboard.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

pub fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    // an empty file is a valid, empty layer
    if s.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(s)?)
}

fn keep_some<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() { *dst = src; }
}

/// Merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Config, src: Config) {
    keep_some(&mut dst.log_level, src.log_level);
    keep_some(&mut dst.seed, src.seed);
    merge_section(&mut dst.library, src.library, merge_library);
    merge_section(&mut dst.display, src.display, merge_display);
    merge_section(&mut dst.timing, src.timing, merge_timing);
    merge_section(&mut dst.audio, src.audio, merge_audio);
    merge_section(&mut dst.buttons, src.buttons, merge_buttons);
}

fn merge_section<T>(dst: &mut Option<T>, src: Option<T>, f: fn(&mut T, T)) {
    match (&mut *dst, src) {
        (None, Some(s)) => *dst = Some(s),
        (Some(d), Some(s)) => f(d, s),
        _ => {}
    }
}

fn merge_library(dst: &mut LibraryConfig, src: LibraryConfig) {
    keep_some(&mut dst.root, src.root);
    keep_some(&mut dst.hidden_prefix, src.hidden_prefix);
    keep_some(&mut dst.extension, src.extension);
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    keep_some(&mut dst.width, src.width);
    keep_some(&mut dst.height, src.height);
    keep_some(&mut dst.device, src.device);
    keep_some(&mut dst.backlight, src.backlight);
    keep_some(&mut dst.brightness, src.brightness);
}

fn merge_timing(dst: &mut TimingConfig, src: TimingConfig) {
    keep_some(&mut dst.tick_ms, src.tick_ms);
    keep_some(&mut dst.scroll_delay_ms, src.scroll_delay_ms);
    keep_some(&mut dst.scroll_end_delay_ms, src.scroll_end_delay_ms);
    keep_some(&mut dst.hold_threshold_ms, src.hold_threshold_ms);
    keep_some(&mut dst.volume_repeat_ms, src.volume_repeat_ms);
    keep_some(&mut dst.overlay_ms, src.overlay_ms);
}

fn merge_audio(dst: &mut AudioConfig, src: AudioConfig) {
    keep_some(&mut dst.initial_volume, src.initial_volume);
    keep_some(&mut dst.volume_step, src.volume_step);
}

fn merge_buttons(dst: &mut ButtonsConfig, src: ButtonsConfig) {
    keep_some(&mut dst.chip, src.chip);
    keep_some(&mut dst.primary, src.primary);
    keep_some(&mut dst.secondary, src.secondary);
    keep_some(&mut dst.advance, src.advance);
    keep_some(&mut dst.active_low, src.active_low);
}

pub fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug { cfg.log_level = Some("debug".to_string()); }
    if cli.seed.is_some() { cfg.seed = cli.seed; }

    if cli.root.is_some() || cli.extension.is_some() {
        let library = cfg.library.get_or_insert_with(LibraryConfig::default);
        keep_some(&mut library.root, cli.root.clone());
        keep_some(&mut library.extension, cli.extension.clone());
    }
    if cli.volume.is_some() {
        cfg.audio.get_or_insert_with(AudioConfig::default).initial_volume = cli.volume;
    }
    if cli.fb_device.is_some() {
        cfg.display.get_or_insert_with(DisplayConfig::default).device = cli.fb_device.clone();
    }
}

/// Strip a leading dot from the extension, "ogg" and ".ogg" mean the same.
fn normalize(cfg: &mut Config) {
    if let Some(ext) = cfg.library.as_mut().and_then(|l| l.extension.as_mut()) {
        if let Some(stripped) = ext.strip_prefix('.') {
            *ext = stripped.to_string();
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if display.width == Some(0) || display.height == Some(0) {
            return Err(ConfigError::Validation("display width/height must be > 0".into()));
        }
    }
    if let Some(ext) = cfg.library.as_ref().and_then(|l| l.extension.as_ref()) {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation("library extension must be a bare suffix like \"ogg\"".into()));
        }
    }
    if let Some(audio) = cfg.audio.as_ref() {
        if let Some(v) = audio.initial_volume {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Validation("audio initial_volume must be 0.0..=1.0".into()));
            }
        }
        if let Some(s) = audio.volume_step {
            // the level moves in whole percent
            let percent = s * 100.0;
            if !(0.01..=1.0).contains(&s) || (percent - percent.round()).abs() > 1e-3 {
                return Err(ConfigError::Validation(
                    "audio volume_step must be a whole percent between 0.01 and 1.0".into(),
                ));
            }
        }
    }
    if let Some(t) = cfg.timing.as_ref() {
        let all = [
            ("tick_ms", t.tick_ms),
            ("scroll_delay_ms", t.scroll_delay_ms),
            ("scroll_end_delay_ms", t.scroll_end_delay_ms),
            ("hold_threshold_ms", t.hold_threshold_ms),
            ("volume_repeat_ms", t.volume_repeat_ms),
            ("overlay_ms", t.overlay_ms),
        ];
        if let Some((name, _)) = all.iter().find(|(_, v)| *v == Some(0)) {
            return Err(ConfigError::Validation(format!("timing {name} must be > 0")));
        }
    }
    Ok(())
}

fn ms_or(v: Option<u64>, default: Duration) -> Duration {
    v.map(Duration::from_millis).unwrap_or(default)
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn library_settings(&self) -> LibrarySettings {
        let l = self.library.clone().unwrap_or_default();
        LibrarySettings {
            root: l.root.unwrap_or_else(|| PathBuf::from(DEFAULT_LIBRARY_ROOT)),
            hidden_prefix: l.hidden_prefix.unwrap_or_else(|| DEFAULT_HIDDEN_PREFIX.to_string()),
            extension: l.extension.unwrap_or_else(|| DEFAULT_AUDIO_EXTENSION.to_string()),
        }
    }

    pub fn app_settings(&self) -> AppSettings {
        let t = self.timing.clone().unwrap_or_default();
        let a = self.audio.clone().unwrap_or_default();
        AppSettings {
            marquee: MarqueeTiming {
                step: ms_or(t.scroll_delay_ms, SCROLL_DELAY),
                hold: ms_or(t.scroll_end_delay_ms, SCROLL_END_DELAY),
            },
            hold: HoldTiming {
                threshold: ms_or(t.hold_threshold_ms, HOLD_THRESHOLD),
                repeat: ms_or(t.volume_repeat_ms, VOLUME_REPEAT_DELAY),
            },
            overlay: ms_or(t.overlay_ms, OVERLAY_DURATION),
            initial_volume: a.initial_volume.unwrap_or(DEFAULT_VOLUME),
            volume_step: a.volume_step.unwrap_or(VOLUME_STEP),
        }
    }

    /// Loop period
    pub fn tick(&self) -> Duration {
        ms_or(self.timing.as_ref().and_then(|t| t.tick_ms), TICK)
    }

    pub fn display_size(&self) -> (u32, u32) {
        let d = self.display.as_ref();
        (
            d.and_then(|d| d.width).unwrap_or(DISPLAY_WIDTH),
            d.and_then(|d| d.height).unwrap_or(DISPLAY_HEIGHT),
        )
    }

    pub fn fb_device(&self) -> PathBuf {
        self.display
            .as_ref()
            .and_then(|d| d.device.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FB_DEVICE))
    }

    pub fn backlight(&self) -> Option<PathBuf> {
        self.display.as_ref().and_then(|d| d.backlight.clone())
    }

    pub fn brightness(&self) -> u8 {
        self.display.as_ref().and_then(|d| d.brightness).unwrap_or(DEFAULT_BRIGHTNESS)
    }

    pub fn button_wiring(&self) -> ButtonWiring {
        let b = self.buttons.clone().unwrap_or_default();
        ButtonWiring {
            chip: b.chip.unwrap_or_else(|| PathBuf::from(DEFAULT_GPIO_CHIP)),
            primary: b.primary.unwrap_or(DEFAULT_PRIMARY_LINE),
            secondary: b.secondary.unwrap_or(DEFAULT_SECONDARY_LINE),
            advance: b.advance.unwrap_or(DEFAULT_ADVANCE_LINE),
            active_low: b.active_low.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_any_layer() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.library_settings(), LibrarySettings::default());
        assert_eq!(cfg.app_settings(), AppSettings::default());
        assert_eq!(cfg.tick(), TICK);
        assert_eq!(cfg.display_size(), (240, 135));
        assert_eq!(cfg.fb_device(), PathBuf::from("/dev/fb0"));
        assert_eq!(cfg.brightness(), 128);
        assert!(cfg.button_wiring().active_low);
    }

    #[test]
    fn test_yaml_sections() {
        let cfg = parse_yaml(
            "library:\n  root: /srv/sounds\n  extension: opus\n\
             timing:\n  tick_ms: 20\n  overlay_ms: 2000\n\
             audio:\n  initial_volume: 0.8\n\
             buttons:\n  primary: 5\n  active_low: false\n\
             seed: 42\n",
        )
        .unwrap();
        assert_eq!(cfg.library_settings().root, PathBuf::from("/srv/sounds"));
        assert_eq!(cfg.library_settings().extension, "opus");
        assert_eq!(cfg.library_settings().hidden_prefix, ".");
        assert_eq!(cfg.tick(), Duration::from_millis(20));
        let app = cfg.app_settings();
        assert_eq!(app.overlay, Duration::from_millis(2000));
        assert_eq!(app.initial_volume, 0.8);
        assert_eq!(app.hold, HoldTiming::default());
        let wiring = cfg.button_wiring();
        assert_eq!(wiring.primary, 5);
        assert_eq!(wiring.secondary, DEFAULT_SECONDARY_LINE);
        assert!(!wiring.active_low);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn test_empty_yaml_is_empty_layer() {
        assert_eq!(parse_yaml("  \n").unwrap(), Config::default());
        assert!(matches!(parse_yaml("library: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_merge_is_field_by_field() {
        let mut base = parse_yaml("display:\n  width: 320\n  height: 170\nlog_level: warn\n").unwrap();
        let top = parse_yaml("display:\n  height: 240\n").unwrap();
        merge(&mut base, top);
        assert_eq!(base.display_size(), (320, 240));
        assert_eq!(base.log_level(), "warn");
    }

    #[test]
    fn test_cli_wins_over_yaml() {
        let mut cfg = parse_yaml("library:\n  root: /a\n  hidden_prefix: _\naudio:\n  initial_volume: 0.2\n").unwrap();
        let cli = Cli {
            root: Some(PathBuf::from("/b")),
            volume: Some(0.9),
            debug: true,
            log_level: Some("warn".to_string()),
            fb_device: Some(PathBuf::from("/dev/fb1")),
            ..Cli::default()
        };
        apply_cli_overrides(&mut cfg, &cli);
        assert_eq!(cfg.library_settings().root, PathBuf::from("/b"));
        assert_eq!(cfg.library_settings().hidden_prefix, "_");
        assert_eq!(cfg.app_settings().initial_volume, 0.9);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.fb_device(), PathBuf::from("/dev/fb1"));
    }

    #[test]
    fn test_leading_dot_extension_is_stripped() {
        let mut cfg = parse_yaml("library:\n  extension: .OGG\n").unwrap();
        normalize(&mut cfg);
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.library_settings().extension, "OGG");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for yaml in [
            "display:\n  width: 0\n",
            "library:\n  extension: ''\n",
            "audio:\n  initial_volume: 1.5\n",
            "audio:\n  volume_step: 0\n",
            "audio:\n  volume_step: 0.004\n",
            "audio:\n  volume_step: 0.033\n",
            "timing:\n  hold_threshold_ms: 0\n",
        ] {
            let cfg = parse_yaml(yaml).unwrap();
            assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))), "{yaml}");
        }
    }

    #[test]
    fn test_whole_percent_volume_steps_pass() {
        for yaml in ["audio:\n  volume_step: 0.01\n", "audio:\n  volume_step: 0.05\n", "audio:\n  volume_step: 0.25\n"] {
            let cfg = parse_yaml(yaml).unwrap();
            assert!(validate(&cfg).is_ok(), "{yaml}");
        }
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let cli = Cli { config: Some(PathBuf::from("/nonexistent/soundboard.yaml")), ..Cli::default() };
        assert!(matches!(load(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_file_and_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.yaml");
        fs::write(&path, "library:\n  root: /x\n").unwrap();
        let cli = Cli { config: Some(path), seed: Some(7), ..Cli::default() };
        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.library_settings().root, PathBuf::from("/x"));
        let dumped = dump_config(&cfg).unwrap();
        assert_eq!(parse_yaml(&dumped).unwrap(), cfg);
    }
}
