//! `sse-delta` — convert a delta-encoded SSE stream into a JSON document.
//!
//! Usage:
//!   sse-delta [INPUT] [--strict] [--compact] [--pointer PTR]
//!
//! The stream is read from INPUT, or from stdin when INPUT is absent or `-`.
//! The consolidated document is written to stdout.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sse_delta::{ConvertOptions, ConvertReport, Conversion, DeltaMerger};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sse-delta")]
#[command(about = "Rebuild a JSON document from a delta-encoded SSE stream")]
#[command(version)]
struct Cli {
    /// SSE input file (stdin if absent or "-")
    input: Option<PathBuf>,
    /// Fail on the first malformed event or rejected operation
    #[arg(long)]
    strict: bool,
    /// Apply a trailing event that is not terminated by a blank line
    #[arg(long)]
    flush_trailing: bool,
    /// Print single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
    /// Print only the value at this pointer
    #[arg(long)]
    pointer: Option<String>,
    /// Print conversion statistics to stderr
    #[arg(long)]
    stats: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            strict: self.strict,
            flush_trailing_event: self.flush_trailing,
            ..ConvertOptions::default()
        }
    }
}

fn run(cli: &Cli) -> Result<Conversion, sse_delta::ConvertError> {
    let mut merger = DeltaMerger::new(cli.options());
    match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            tracing::info!(path = %path.display(), "reading stream");
            merger.feed_reader(BufReader::new(File::open(path)?))?;
        }
        _ => {
            tracing::info!("reading stream from stdin");
            merger.feed_reader(io::stdin().lock())?;
        }
    }
    merger.finish()
}

fn print_stats(report: &ConvertReport) {
    eprintln!(
        "events: {}  delta: {}  applied: {}  skipped: {}  done: {}",
        report.events, report.delta_events, report.ops_applied, report.ops_skipped, report.done
    );
    for diagnostic in &report.diagnostics {
        eprintln!("  {diagnostic}");
    }
    if report.diagnostics_dropped > 0 {
        eprintln!("  ... {} more", report.diagnostics_dropped);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(cli.log_level())
        .with_writer(io::stderr)
        .init();

    let conversion = match run(&cli) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.stats {
        print_stats(&conversion.report);
    }

    let selected = match cli.pointer.as_deref() {
        Some(ptr) => match sse_delta_pointer::get_by_pointer(&conversion.document, ptr) {
            Some(v) => v,
            None => {
                tracing::error!(pointer = ptr, "pointer selects nothing");
                return ExitCode::FAILURE;
            }
        },
        None => &conversion.document,
    };

    let rendered = if cli.compact {
        serde_json::to_string(selected)
    } else {
        serde_json::to_string_pretty(selected)
    };
    let rendered = match rendered {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{rendered}") {
        tracing::error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
