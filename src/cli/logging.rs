//! Module implementing logging for the application.
//!
//! This includes setting up log filtering given a verbosity value,
//! as well as defining how the logs are being formatted to stderr
//! and to the log file.

use std::borrow::Cow;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use ansi_term::{Colour, Style};
use slog::{Drain, Duplicate, FilterLevel, Level, Logger, OwnedKVList, Record};
use slog_envlogger::LogBuilder as EnvLogBuilder;
use slog_scope::GlobalLoggerGuard;

use super::{NAME, VERSION};


// Default logging level defined using the two enums used by slog.
// Both values must correspond to the same level. (This is checked by a test).
const DEFAULT_LEVEL: Level = Level::Info;
const DEFAULT_FILTER_LEVEL: FilterLevel = FilterLevel::Info;

// Arrays of log levels, indexed by verbosity.
const POSITIVE_VERBOSITY_LEVELS: &[FilterLevel] = &[
    DEFAULT_FILTER_LEVEL,
    FilterLevel::Debug,
    FilterLevel::Trace,
];
const NEGATIVE_VERBOSITY_LEVELS: &[FilterLevel] = &[
    DEFAULT_FILTER_LEVEL,
    FilterLevel::Warning,
    FilterLevel::Error,
    FilterLevel::Critical,
    FilterLevel::Off,
];

/// Level of messages written to the log file, regardless of verbosity.
const FILE_LEVEL: Level = Level::Debug;


/// Initialize logging with given verbosity,
/// duplicating the messages to given log file.
///
/// The returned guard must be kept alive for as long as the logging is needed.
pub fn init<P: AsRef<Path>>(verbosity: isize, log_file: P) -> io::Result<GlobalLoggerGuard> {
    let console = console_drain(verbosity);
    let file = FileDrain::open(log_file.as_ref())?.filter_level(FILE_LEVEL);
    let drain = Duplicate::new(console, file).ignore_res();

    let logger = Logger::root(drain, o!());
    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init_with_level(log::Level::Trace)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    if verbosity > 0 {
        debug!("Logging verbosity set to {}", verbosity);
    }
    Ok(guard)
}

/// Create the drain for logging to stderr, filtered by verbosity & $RUST_LOG.
fn console_drain(verbosity: isize) -> impl Drain<Ok=(), Err=io::Error> {
    let mut builder = EnvLogBuilder::new(ConsoleDrain::new())
        .filter(None, filter_level(verbosity));
    if let Ok(ref directives) = env::var("RUST_LOG") {
        builder = builder.parse(directives);
    }
    builder.build()
}

fn filter_level(verbosity: isize) -> FilterLevel {
    let levels = if verbosity >= 0 {
        POSITIVE_VERBOSITY_LEVELS
    } else {
        NEGATIVE_VERBOSITY_LEVELS
    };
    let index = verbosity.abs() as usize;
    levels[index.min(levels.len() - 1)]
}


/// Drain formatting the messages for a human watching the terminal.
struct ConsoleDrain {
    colored: bool,
}

impl ConsoleDrain {
    pub fn new() -> Self {
        ConsoleDrain{colored: isatty::stderr_isatty()}
    }
}

impl Drain for ConsoleDrain {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, _: &OwnedKVList) -> io::Result<()> {
        let level = format!("{}:", record.level().as_short_str());
        let level = if self.colored {
            Cow::Owned(level_style(record.level()).paint(level).to_string())
        } else {
            Cow::Borrowed(level.as_str())
        };

        let stderr = io::stderr();
        let mut stderr = stderr.lock();
        // Module path is only interesting when debugging.
        if !record.level().is_at_least(DEFAULT_LEVEL) {
            writeln!(stderr, "{} {} {}", level, record.module(), record.msg())
        } else {
            writeln!(stderr, "{} {}", level, record.msg())
        }
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Critical => Colour::Purple.bold(),
        Level::Error => Colour::Red.normal(),
        Level::Warning => Colour::Yellow.normal(),
        Level::Info => Colour::Green.normal(),
        Level::Debug => Colour::Blue.normal(),
        Level::Trace => Style::new().dimmed(),
    }
}


/// Drain appending timestamped lines to a file.
struct FileDrain {
    file: File,
}

impl FileDrain {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(FileDrain{file})
    }
}

impl Drain for FileDrain {
    type Ok = ();
    type Err = io::Error;

    fn log(&self, record: &Record, _: &OwnedKVList) -> io::Result<()> {
        let line = format!("{} {} v{} {}:{} {}\n",
            time::now().rfc3339(), *NAME, VERSION.unwrap_or("?"),
            record.level().as_str(), record.module(), record.msg());
        (&self.file).write_all(line.as_bytes())
    }
}
