use std::io::{self, IsTerminal};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use crate::overlay::layout::{PANEL_MAX_WIDTH, PANEL_MIN_WIDTH};
use crate::overlay::{DEFAULT_PANEL_WIDTH, DEFAULT_POSITION, OverlayConfig, Position};
use crate::tracing_sub::level_for_verbosity;

const TICK_MS_RANGE: RangeInclusive<u64> = 5..=1000;
/// Focus updates are picked up once per tick.
const DEFAULT_TICK_MS: u64 = 16;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "focus-lens",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating panel showing the focused application and window"
)]
pub struct Cli {
    /// Focus event feed, one `kind<TAB>app<TAB>window` line per event.
    /// `-` reads stdin. Without it, stdin is used when it is not a terminal.
    #[arg(long = "events", value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Column the panel appears at when shown.
    #[arg(
        long = "origin-x",
        value_name = "COL",
        default_value_t = DEFAULT_POSITION.x,
        allow_negative_numbers = true
    )]
    pub origin_x: i32,

    /// Row the panel appears at when shown.
    #[arg(
        long = "origin-y",
        value_name = "ROW",
        default_value_t = DEFAULT_POSITION.y,
        allow_negative_numbers = true
    )]
    pub origin_y: i32,

    /// Panel width in columns.
    #[arg(long = "width", value_name = "COLS", default_value_t = DEFAULT_PANEL_WIDTH)]
    pub width: u16,

    /// Start with the panel hidden.
    #[arg(long = "no-overlay")]
    pub no_overlay: bool,

    /// Append log output to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log detail; repeat for trace output.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// UI poll interval.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("width must be between 28 and 120 columns, got {0}")]
    Width(u16),
    #[error("tick must be between 5 and 1000 ms, got {0}")]
    Tick(u64),
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    Stdin,
    File(PathBuf),
    /// No feed; the panel only ever shows the placeholder.
    Disabled,
}

impl EventSource {
    pub fn resolve(events: Option<&Path>, stdin_is_terminal: bool) -> Self {
        match events {
            Some(path) if path.as_os_str() == "-" => EventSource::Stdin,
            Some(path) => EventSource::File(path.to_path_buf()),
            None if !stdin_is_terminal => EventSource::Stdin,
            None => EventSource::Disabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub events: EventSource,
    pub overlay: OverlayConfig,
    pub show_overlay: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub tick: Duration,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli, stdin_is_terminal: bool) -> Result<Self, ConfigError> {
        if !(PANEL_MIN_WIDTH..=PANEL_MAX_WIDTH).contains(&cli.width) {
            return Err(ConfigError::Width(cli.width));
        }
        if !TICK_MS_RANGE.contains(&cli.tick_ms) {
            return Err(ConfigError::Tick(cli.tick_ms));
        }
        Ok(Self {
            events: EventSource::resolve(cli.events.as_deref(), stdin_is_terminal),
            overlay: OverlayConfig {
                default_position: Position::new(cli.origin_x, cli.origin_y),
                width: cli.width,
            },
            show_overlay: !cli.no_overlay,
            log_file: cli.log_file.clone(),
            log_level: level_for_verbosity(cli.verbose),
            tick: Duration::from_millis(cli.tick_ms),
        })
    }
}

impl TryFrom<&Cli> for AppConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        Self::from_cli(cli, io::stdin().is_terminal())
    }
}
