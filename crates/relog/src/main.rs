//! relog reads log lines from stdin and writes normalized records to
//! stdout. Diagnostics go to stderr.

use std::io::IsTerminal;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use relog::cli::Cli;
use relog::config::{OutputFormat, RelogConfig};
use relog::output::{ConsoleSink, JsonSink};
use relog_core::{ReaderSource, RecordSink, Relogger, relog_all};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // ── Load config ─────────────────────────────────────────────
    let mut config = RelogConfig::discover(cli.config.as_deref(), &std::env::current_dir()?)?;
    cli.apply(&mut config);
    config.validate()?;

    let use_color = config.output.color.enabled(std::io::stdout().is_terminal());
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.output.format,
        use_color,
        "relog starting"
    );

    // ── Pipeline ────────────────────────────────────────────────
    let mut relogger = Relogger::new(config.relog_options(use_color));
    let mut source = ReaderSource::new(BufReader::new(tokio::io::stdin()));
    let mut sink: Box<dyn RecordSink> = match config.output.format {
        OutputFormat::Console => Box::new(ConsoleSink::new(
            std::io::stdout(),
            config.output.time_format.clone(),
            use_color,
        )),
        OutputFormat::Json => Box::new(JsonSink::new(std::io::stdout())),
    };

    tokio::select! {
        result = relog_all(&mut source, &mut relogger, sink.as_mut()) => match result {
            Ok(stats) => tracing::debug!(
                lines = stats.lines_read,
                records = stats.records_emitted,
                "relog finished"
            ),
            Err(e) => {
                tracing::error!(error = %e, "relog stopped");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("interrupted");
        }
    }

    Ok(())
}
