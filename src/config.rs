use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::{
    DEFAULT_ACTIVE_LINES, DEFAULT_BAUD, DEFAULT_CHARSET, DEFAULT_INTERVAL_SECS, DEFAULT_PORT,
    DEFAULT_SLOTS, MAX_INTERVAL_SECS, MAX_ROWS, MAX_SLOTS, MIN_INTERVAL_SECS,
};
use crate::display::ControllerConfig;
use crate::presets::find_preset;

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

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// serial link and geometry
    pub display: Option<DisplayConfig>,
    /// what gets shown and how often
    pub rotation: Option<RotationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub port: Option<String>,       // e.g. "/dev/ttyUSB0"
    pub baud: Option<u32>,
    pub charset: Option<u8>,        // national character set code
    pub lines: Option<usize>,       // 2 = BA63, 4 = BA66
    pub slots: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RotationConfig {
    pub interval_secs: Option<u32>,
    pub auto: Option<bool>,
    pub preset: Option<String>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "ba63mon", version, about = "BA63 message rotator", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Enable debug log level
    #[arg(long, short = 'v', alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Serial device the display is attached to
    #[arg(long, short = 'p', value_hint = ValueHint::FilePath)]
    pub port: Option<String>,
    #[arg(long)]
    pub baud: Option<u32>,
    /// National character set code sent at start-up
    #[arg(long)]
    pub charset: Option<u8>,
    /// Rows shown by the display (2 for BA63, 4 for BA66)
    #[arg(long)]
    pub lines: Option<usize>,
    #[arg(long)]
    pub slots: Option<usize>,
    /// Seconds between auto-advance steps
    #[arg(long, short = 'i')]
    pub interval: Option<u32>,
    /// Start with auto-advance on
    #[arg(long, short = 'a', action = ArgAction::SetTrue)]
    pub auto: bool,
    /// Preset loaded at start-up
    #[arg(long, short = 'P')]
    pub preset: Option<String>,
    /// Write to a mock link instead of the serial port
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn port(&self) -> &str {
        self.display.as_ref().and_then(|d| d.port.as_deref()).unwrap_or(DEFAULT_PORT)
    }

    pub fn baud(&self) -> u32 {
        self.display.as_ref().and_then(|d| d.baud).unwrap_or(DEFAULT_BAUD)
    }

    pub fn auto(&self) -> bool {
        self.rotation.as_ref().and_then(|r| r.auto).unwrap_or(false)
    }

    pub fn preset(&self) -> Option<&str> {
        self.rotation.as_ref().and_then(|r| r.preset.as_deref())
    }

    /// Resolve the controller settings, filling gaps with defaults.
    pub fn controller_config(&self) -> ControllerConfig {
        let display = self.display.clone().unwrap_or_default();
        let rotation = self.rotation.clone().unwrap_or_default();
        ControllerConfig {
            slots: display.slots.unwrap_or(DEFAULT_SLOTS),
            active_lines: display.lines.unwrap_or(DEFAULT_ACTIVE_LINES),
            interval_secs: rotation.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS),
            charset: display.charset.unwrap_or(DEFAULT_CHARSET),
        }
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((cfg, cli))
}

/// Layer defaults, YAML and CLI for an already parsed command line.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/ba63mon/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/ba63mon/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/ba63mon.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["ba63mon.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
pub fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()      { dst.log_level = src.log_level; }
    // display
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    // rotation
    match (&mut dst.rotation, src.rotation) {
        (None, Some(c)) => dst.rotation = Some(c),
        (Some(d), Some(s)) => merge_rotation(d, s),
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.port.is_some()     { dst.port = src.port; }
    if src.baud.is_some()     { dst.baud = src.baud; }
    if src.charset.is_some()  { dst.charset = src.charset; }
    if src.lines.is_some()    { dst.lines = src.lines; }
    if src.slots.is_some()    { dst.slots = src.slots; }
}

fn merge_rotation(dst: &mut RotationConfig, src: RotationConfig) {
    if src.interval_secs.is_some() { dst.interval_secs = src.interval_secs; }
    if src.auto.is_some()          { dst.auto = src.auto; }
    if src.preset.is_some()        { dst.preset = src.preset; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()       { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                     { cfg.log_level = Some("debug".to_string()); }

    let any_display = cli.port.is_some()
        || cli.baud.is_some()
        || cli.charset.is_some()
        || cli.lines.is_some()
        || cli.slots.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.port.is_some()     { display.port = cli.port.clone(); }
        if cli.baud.is_some()     { display.baud = cli.baud; }
        if cli.charset.is_some()  { display.charset = cli.charset; }
        if cli.lines.is_some()    { display.lines = cli.lines; }
        if cli.slots.is_some()    { display.slots = cli.slots; }
    }

    let any_rotation = cli.interval.is_some() || cli.auto || cli.preset.is_some();
    if any_rotation && cfg.rotation.is_none() {
        cfg.rotation = Some(RotationConfig::default());
    }
    if let Some(rotation) = cfg.rotation.as_mut() {
        if cli.interval.is_some() { rotation.interval_secs = cli.interval; }
        if cli.auto               { rotation.auto = Some(true); }
        if cli.preset.is_some()   { rotation.preset = cli.preset.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(display) = cfg.display.as_ref() {
        if let Some(port) = display.port.as_ref() {
            if port.is_empty() {
                return Err(ConfigError::Validation("display port must not be empty".into()));
            }
        }
        if display.baud == Some(0) {
            return Err(ConfigError::Validation("display baud must be > 0".into()));
        }
        if let Some(lines) = display.lines {
            if !(1..=MAX_ROWS).contains(&lines) {
                return Err(ConfigError::Validation(format!("display lines must be 1..={}", MAX_ROWS)));
            }
        }
        if let Some(slots) = display.slots {
            if !(1..=MAX_SLOTS).contains(&slots) {
                return Err(ConfigError::Validation(format!("display slots must be 1..={}", MAX_SLOTS)));
            }
        }
    }
    if let Some(rotation) = cfg.rotation.as_ref() {
        if let Some(secs) = rotation.interval_secs {
            if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
                return Err(ConfigError::Validation(format!(
                    "rotation interval_secs must be {}..={}",
                    MIN_INTERVAL_SECS, MAX_INTERVAL_SECS
                )));
            }
        }
        if let Some(name) = rotation.preset.as_deref() {
            if find_preset(name).is_none() {
                return Err(ConfigError::Validation(format!("unknown preset: {}", name)));
            }
        }
    }
    Ok(())
}
