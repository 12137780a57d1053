//! Data structures for command-line arguments.

use std::error::Error;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use memer::{MemeSpec, MemeSpecBuildError};


/// Structure to hold options received from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Verbosity of the logging output.
    ///
    /// Corresponds to the number of times the -v flag has been passed.
    /// If -q has been used instead, this will be negative.
    pub verbosity: isize,

    /// The meme to make.
    pub meme: MemeSpec,
    /// Whether to show the finished meme & put it on the clipboard.
    pub show: bool,

    /// Directory to save the finished meme to.
    pub save_dir: PathBuf,
    /// File to read the Twitter API token from.
    pub token_file: PathBuf,
    /// File to append the debug log to.
    pub log_file: PathBuf,
    /// Timeout of each network request.
    pub timeout: Duration,
}

#[allow(dead_code)]
impl Options {
    #[inline]
    pub fn verbose(&self) -> bool { self.verbosity > 0 }
    #[inline]
    pub fn quiet(&self) -> bool { self.verbosity < 0 }
}


macro_attr! {
    /// Error that can occur while parsing of command line arguments.
    #[derive(Debug, EnumFromInner!)]
    pub enum ArgsError {
        /// General when parsing the arguments.
        Parse(clap::Error),
        /// Invalid description of the meme.
        Meme(MemeSpecBuildError),
        /// Invalid --timeout value.
        Timeout(ParseIntError),
    }
}

impl Error for ArgsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ArgsError::Parse(ref e) => Some(e),
            ArgsError::Meme(ref e) => Some(e),
            ArgsError::Timeout(ref e) => Some(e),
        }
    }
}

impl fmt::Display for ArgsError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArgsError::Parse(ref e) => write!(fmt, "invalid arguments: {}", e),
            ArgsError::Meme(ref e) => write!(fmt, "invalid meme: {}", e),
            ArgsError::Timeout(ref e) => write!(fmt, "invalid timeout: {}", e),
        }
    }
}
