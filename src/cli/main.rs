//!
//! memer -- Memes from links, in the shell
//!

             extern crate ansi_term;
             extern crate arboard;
             extern crate clap;
             extern crate conv;
#[macro_use] extern crate enum_derive;
             extern crate exitcode;
             extern crate isatty;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate macro_attr;
             extern crate memer;
#[macro_use] extern crate slog;
             extern crate slog_envlogger;
             extern crate slog_scope;
             extern crate slog_stdlog;
             extern crate time;

// `log` must be at the end of these declarations because we want to simultaneously:
// * use the standard `log` macros (which would be shadowed by `slog`)
// * be able to initialize the slog logger using slog macros like o!()
#[macro_use] extern crate log;

#[cfg(test)]              extern crate spectral;


mod args;
mod clipboard;
mod display;
mod logging;


use std::env;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::process::exit;
use std::time::Instant;

use memer::{EngineBuildError, EngineBuilder, MemeError, ResolveError};

use crate::args::{ArgsError, Options};


lazy_static! {
    /// Application / package name, as filled out by Cargo.
    static ref NAME: &'static str = option_env!("CARGO_PKG_NAME").unwrap_or("memer");

    /// Application version, as filled out by Cargo.
    static ref VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

    /// Git revision the binary has been built from, as filled out by the build script.
    static ref REVISION: Option<&'static str> = option_env!("MEMER_REVISION");
}


fn main() {
    let opts = args::parse().unwrap_or_else(|e| {
        let code = match e {
            ArgsError::Parse(ref e) if is_help_or_version(e) => exitcode::OK,
            _ => exitcode::USAGE,
        };
        print_args_error(e).unwrap_or(());
        exit(code);
    });

    let guard = logging::init(opts.verbosity, &opts.log_file).unwrap_or_else(|e| {
        writeln!(&mut io::stderr(),
            "Failed to set up logging to {}: {}", opts.log_file.display(), e).unwrap_or(());
        exit(exitcode::IOERR);
    });
    debug!("{} v{} (rev. {}) starting",
        *NAME, VERSION.unwrap_or("<UNKNOWN>"), REVISION.unwrap_or("<UNKNOWN>"));
    if cfg!(debug_assertions) {
        warn!("Debug mode! The program will likely be much slower.");
    }
    for (i, arg) in env::args().enumerate() {
        debug!("argv[{}] = {:?}", i, arg);
    }
    trace!("Options parsed from argv:\n{:#?}", opts);

    let start = Instant::now();
    let code = match run(&opts) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                debug!("Caused by: {}", cause);
                source = cause.source();
            }
            e.exit_code()
        }
    };
    info!("Finished in {:.2}s", start.elapsed().as_secs_f64());

    drop(guard);
    exit(code);
}

/// Print an error that may occur while parsing arguments.
fn print_args_error(e: ArgsError) -> io::Result<()> {
    match e {
        ArgsError::Parse(ref e) =>
            // In case of generic parse error,
            // message provided by the clap library will be the usage string.
            writeln!(&mut io::stderr(), "{}", e.message),
        e => {
            writeln!(&mut io::stderr(), "Failed to parse arguments: {}", e)
        },
    }
}

fn is_help_or_version(e: &clap::Error) -> bool {
    match e.kind {
        clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => true,
        _ => false,
    }
}


/// Make the meme, save it, and show it if requested.
fn run(opts: &Options) -> Result<(), RunError> {
    let engine = EngineBuilder::new()
        .timeout(opts.timeout)
        .token_file(&opts.token_file)
        .build()?;
    let output = engine.meme(opts.meme.clone())?;
    info!("Made a {}x{} meme", output.dimensions().0, output.dimensions().1);

    let path = output.save_to(&opts.save_dir)?;
    info!("Saved the meme to {}", path.display());

    if opts.show {
        if let Err(e) = clipboard::copy(&output) {
            warn!("Failed to copy the meme to the clipboard: {}", e);
        }
        if let Err(e) = display::open(&path) {
            warn!("Failed to open {} in an image viewer: {}", path.display(), e);
        }
    }
    Ok(())
}


macro_attr! {
    /// Error that can end the program's run.
    #[derive(Debug, EnumFromInner!)]
    enum RunError {
        /// The engine couldn't be set up.
        Build(EngineBuildError),
        /// The meme couldn't be made.
        Meme(MemeError),
        /// The meme couldn't be saved.
        Save(io::Error),
    }
}

impl RunError {
    /// Exit code of the program for this error.
    fn exit_code(&self) -> i32 {
        match *self {
            RunError::Build(EngineBuildError::Config(_)) => exitcode::USAGE,
            RunError::Build(EngineBuildError::CredentialsConflict) => exitcode::USAGE,
            RunError::Build(EngineBuildError::Http(_)) => exitcode::SOFTWARE,
            RunError::Meme(ref e) => meme_exit_code(e),
            RunError::Save(_) => exitcode::CANTCREAT,
        }
    }
}

fn meme_exit_code(e: &MemeError) -> i32 {
    match *e {
        MemeError::Resolve(ResolveError::UnrecognizedLink(_)) => exitcode::DATAERR,
        MemeError::Resolve(ResolveError::AttachmentIndex(_)) => exitcode::NOINPUT,
        MemeError::Resolve(ResolveError::CredentialMissing(_)) => exitcode::CONFIG,
        MemeError::Resolve(ResolveError::UpstreamResolution(_)) => exitcode::UNAVAILABLE,
        MemeError::Fetch(_) | MemeError::Upload(_) | MemeError::Render(_) => exitcode::UNAVAILABLE,
        MemeError::TooLarge(..) => exitcode::DATAERR,
        MemeError::Decode(..) | MemeError::Encode(_) => exitcode::SOFTWARE,
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RunError::Build(ref e) => Some(e),
            RunError::Meme(ref e) => Some(e),
            RunError::Save(ref e) => Some(e),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RunError::Build(ref e) => write!(fmt, "cannot set up: {}", e),
            RunError::Meme(ref e) => write!(fmt, "{}", e),
            RunError::Save(ref e) => write!(fmt, "cannot save the meme: {}", e),
        }
    }
}
