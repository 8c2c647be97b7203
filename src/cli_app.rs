//! Command-line definition and daemon bootstrap.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use oled_status::core::config::Config;
use oled_status::core::errors::OstError;
use oled_status::daemon::loop_main::{LoopParts, MainLoop, Verbosity};

/// Status-display daemon for a 128x64 OLED panel.
#[derive(Debug, Parser)]
#[command(
    name = "oled-status",
    author,
    version,
    about = "Rotating system, ADS-B and mesh tracker pages on an SSD1306 OLED",
    long_about = None
)]
pub struct Cli {
    /// Comma-separated pages to rotate through: adsb, mesh, sysstat.
    #[arg(long, value_name = "LIST")]
    detail: Option<String>,
    /// Mesh tracker file read by the mesh page.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Run without the hardware display.
    #[arg(long)]
    headless: bool,
    /// I2C bus device node of the panel.
    #[arg(long, value_name = "PATH")]
    i2c_bus: Option<PathBuf>,
    /// Network interface whose IPv4 address is shown in the header.
    #[arg(long, value_name = "NAME")]
    interface: Option<String>,
    /// Append activity events as JSON lines to this file.
    #[arg(long, value_name = "PATH")]
    activity_log: Option<PathBuf>,
    /// Validate configuration, print the effective settings as TOML, and exit.
    #[arg(long)]
    check: bool,
    /// Print every composed frame on stderr.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    const fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Command-line values win over the config file and environment.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(detail) = &self.detail {
            config.display.detail.clone_from(detail);
        }
        if let Some(file) = &self.file {
            config.sources.tracker_file.clone_from(file);
        }
        if self.headless {
            config.display.headless = true;
        }
        if let Some(bus) = &self.i2c_bus {
            config.display.i2c_bus.clone_from(bus);
        }
        if let Some(interface) = &self.interface {
            config.sources.interface.clone_from(interface);
        }
        if let Some(path) = &self.activity_log {
            config.paths.activity_log = Some(path.clone());
        }
    }
}

/// Top-level CLI error with an exit-code contract.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad flags, detail list or config file. Raised before the display boots.
    #[error("{0}")]
    Config(OstError),
    /// Display fault or environment failure.
    #[error("{0}")]
    Runtime(OstError),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl From<OstError> for CliError {
    fn from(err: OstError) -> Self {
        if err.is_config_error() {
            Self::Config(err)
        } else {
            Self::Runtime(err)
        }
    }
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
        }
    }
}

/// Build the effective config, then either report it or run the display loop.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.check {
        let rendered = toml::to_string_pretty(&config).map_err(|e| OstError::Serialization {
            context: "config",
            details: e.to_string(),
        })?;
        let mut out = io::stdout().lock();
        writeln!(out, "# config_hash = {}", config.stable_hash()?)?;
        write!(out, "{rendered}")?;
        return Ok(());
    }

    let mut parts = LoopParts::system(&config, cli.verbosity())?;
    if !config.display.headless {
        parts = parts.with_sink(open_panel(&config)?);
    }
    let mut main_loop = MainLoop::new(config, parts)?;
    main_loop.run()?;
    Ok(())
}

#[cfg(feature = "hardware")]
fn open_panel(
    config: &Config,
) -> Result<Box<dyn oled_status::display::sink::DisplaySink>, OstError> {
    let panel = oled_status::display::ssd1306::Ssd1306Sink::open(&config.display.i2c_bus)?;
    Ok(Box::new(panel))
}

#[cfg(not(feature = "hardware"))]
fn open_panel(
    config: &Config,
) -> Result<Box<dyn oled_status::display::sink::DisplaySink>, OstError> {
    Err(OstError::UnsupportedPlatform {
        details: format!(
            "built without the `hardware` feature, cannot drive {}; pass --headless",
            config.display.i2c_bus.display()
        ),
    })
}
