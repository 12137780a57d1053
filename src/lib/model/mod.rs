//! Module defining the data model.

pub mod constants;
mod meme_spec;

pub use self::meme_spec::{MemeSpec,
                          Builder as MemeSpecBuilder,
                          Error as MemeSpecBuildError};
