//! Log backend for the CLI.
//!
//! Everything the commands print goes through the `log` macros so that
//! `--quiet`, `--verbose` and `--logfile` apply uniformly. Messages go to
//! stdout; with a log file they are also written there with ANSI codes
//! removed.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Library crates whose warnings get a `warning:` prefix. CLI messages
/// format themselves.
const LIBRARY_TARGET_PREFIX: &str = "disc_list_";

/// Writes to stdout and, optionally, an ANSI-stripped copy to a file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. Fails only if the log file cannot be created.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let file = match logfile {
        Some(path) => Some(File::create(path)?),
        None => None,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_filter(quiet, verbose))
        .target(env_logger::Target::Pipe(Box::new(TeeWriter { file })))
        .format(move |buf, record| {
            let library = record.target().starts_with(LIBRARY_TARGET_PREFIX);
            let prefix = match record.level() {
                Level::Error => Some(
                    "error:"
                        .if_supports_color(Stdout, |t| t.red())
                        .to_string(),
                ),
                Level::Warn if library => Some(
                    "warning:"
                        .if_supports_color(Stdout, |t| t.yellow())
                        .to_string(),
                ),
                _ => None,
            };

            if verbose {
                write!(
                    buf,
                    "{} {:<5} ",
                    chrono::Local::now()
                        .format("%H:%M:%S%.3f")
                        .if_supports_color(Stdout, |t| t.dimmed()),
                    record.level(),
                )?;
            }
            match prefix {
                Some(p) => writeln!(buf, "{} {}", p, record.args()),
                None => writeln!(buf, "{}", record.args()),
            }
        });

    // A logger can only be installed once per process
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
    Ok(())
}
