//! Module with meme engine configuration.

use std::error;
use std::fmt;
use std::time::Duration;

use crate::model::constants::{DEFAULT_PADDING, DEFAULT_TARGET_SIZE, DEFAULT_TIMEOUT};


/// Structure holding configuration for the `Engine`.
///
/// This is shared with `MemeTask`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Rows of black pixels added above and below the image before rendering.
    pub padding: u32,
    /// Size of the image sent for rendering (see `util::imageops::scaled_dimensions`).
    pub target_size: u32,
    /// Timeout of each network request.
    pub timeout: Duration,
}

impl Default for Config {
    /// Initialize Config with default values.
    fn default() -> Self {
        Config {
            padding: DEFAULT_PADDING,
            target_size: DEFAULT_TARGET_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Check that the configuration values make sense together.
    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout == Duration::from_secs(0) {
            return Err(Error::ZeroTimeout);
        }
        if self.target_size == 0 {
            return Err(Error::ZeroTargetSize);
        }
        if u64::from(self.padding) * 2 >= u64::from(self.target_size) {
            return Err(Error::PaddingTooLarge{
                padding: self.padding, target_size: self.target_size,
            });
        }
        Ok(())
    }
}


/// Invalid `Config` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    ZeroTimeout,
    ZeroTargetSize,
    /// Padding would take up the entire image.
    PaddingTooLarge { padding: u32, target_size: u32 },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::ZeroTimeout => write!(fmt, "network timeout cannot be zero"),
            Error::ZeroTargetSize => write!(fmt, "target image size cannot be zero"),
            Error::PaddingTooLarge{padding, target_size} => write!(fmt,
                "padding of {}px is too large for target size of {}px", padding, target_size),
        }
    }
}
