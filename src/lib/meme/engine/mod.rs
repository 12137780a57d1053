//! Module which defines the meme making engine.

mod builder;
mod config;

pub use self::builder::{Builder, Error as BuildError};
pub use self::config::{Config, Error as ConfigError};


use std::fmt;
use std::sync::Arc;

use crate::model::MemeSpec;
use crate::remote::{ImageFetcher, ImageHost, MemeRenderer};
use crate::resolve::{CredentialSource, MediaResolver, Resolver};
use super::error::MemeError;
use super::output::MemeOutput;
use super::task::MemeTask;


/// `Resolver` with its collaborators chosen at runtime.
pub type DynResolver = Resolver<Box<dyn MediaResolver>, Box<dyn CredentialSource>>;


/// Meme making engine.
///
/// *Note*: `Engine` implements `Clone`
/// by merely cloning a shared reference to the underlying object.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

/// Shared state of the engine that meme tasks have access to.
pub(in crate::meme) struct Inner {
    pub config: Config,
    pub resolver: DynResolver,
    pub fetcher: Box<dyn ImageFetcher>,
    pub host: Box<dyn ImageHost>,
    pub renderer: Box<dyn MemeRenderer>,
}

impl From<Inner> for Engine {
    fn from(inner: Inner) -> Self {
        Engine{inner: Arc::new(inner)}
    }
}

impl Engine {
    /// Create an `Engine` with the default configuration,
    /// talking to the actual remote services.
    ///
    /// For other ways of creating `Engine`, see the `EngineBuilder`.
    #[inline]
    pub fn new() -> Result<Self, BuildError> {
        Builder::new().build()
    }
}

impl Engine {
    /// Make the meme described by given `MemeSpec`.
    ///
    /// This involves several blocking network calls.
    #[inline]
    pub fn meme(&self, spec: MemeSpec) -> Result<MemeOutput, MemeError> {
        MemeTask::new(spec, &self.inner).perform()
    }

    /// The `Resolver` used to find the background image.
    #[inline]
    pub fn resolver(&self) -> &DynResolver {
        &self.inner.resolver
    }

    /// Read the `Engine`'s configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Engine")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
