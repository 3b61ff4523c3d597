//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ColorMode, OutputFormat, RelogConfig};

#[derive(Debug, Parser)]
#[command(
    name = "relog",
    version,
    about = "Normalize mixed JSON, zap, klog, logfmt and plain-text logs read from stdin"
)]
pub struct Cli {
    /// Config file. Defaults to ./relog.toml when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable colors even on a terminal.
    #[arg(long)]
    pub no_color: bool,

    /// strftime pattern for the console time column.
    #[arg(long, value_name = "PATTERN")]
    pub time_format: Option<String>,

    /// Emit relog's own diagnostics (stderr) as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Overlay command-line flags on a loaded config.
    pub fn apply(&self, config: &mut RelogConfig) {
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.no_color {
            config.output.color = ColorMode::Never;
        }
        if let Some(time_format) = &self.time_format {
            config.output.time_format = time_format.clone();
        }
    }
}
