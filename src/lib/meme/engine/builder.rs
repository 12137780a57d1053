//! Module implementing the builder for `Engine`.

use std::error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::remote::{Catbox, HttpClient, ImageFetcher, ImageHost, Memegen, MemeRenderer};
use crate::resolve::{default_matchers, CredentialChain, CredentialSource, EnvToken, LinkMatcher,
                     MediaResolver, Resolver, TokenFile, TwitterApi};
use super::config::{Config, Error as ConfigError};
use super::{Engine, Inner};


/// Builder for `Engine`.
///
/// Every collaborator that isn't set explicitly
/// is created from a shared `HttpClient` when building.
#[must_use = "unused builder which must be used"]
pub struct Builder {
    errors: Vec<Error>,
    config: Config,

    credentials: Option<CredentialsSetup>,
    media_resolver: Option<Box<dyn MediaResolver>>,
    link_matchers: Vec<Box<dyn LinkMatcher>>,
    fetcher: Option<Box<dyn ImageFetcher>>,
    image_host: Option<Box<dyn ImageHost>>,
    renderer: Option<Box<dyn MemeRenderer>>,
}

/// How the credentials for media resolution are obtained.
enum CredentialsSetup {
    /// The default chain, but reading the token from a particular file.
    TokenFile(PathBuf),
    Custom(Box<dyn CredentialSource>),
}

impl Builder {
    /// Create a new `Builder`.
    #[inline]
    pub fn new() -> Self {
        Builder::default()
    }
}
impl Default for Builder {
    fn default() -> Self {
        Builder{
            errors: vec![],
            config: Config::default(),
            credentials: None,
            media_resolver: None,
            link_matchers: vec![],
            fetcher: None,
            image_host: None,
            renderer: None,
        }
    }
}

// Setters.
impl Builder {
    /// Set the timeout of every network request.
    #[inline]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if timeout == Duration::from_secs(0) {
            return self.err(ConfigError::ZeroTimeout.into());
        }
        self.config.timeout = timeout; self
    }

    /// Set the number of pixel rows added above & below the image before rendering.
    #[inline]
    pub fn padding(mut self, padding: u32) -> Self {
        self.config.padding = padding; self
    }

    /// Set the size of the image sent for rendering.
    #[inline]
    pub fn target_size(mut self, size: u32) -> Self {
        if size == 0 {
            return self.err(ConfigError::ZeroTargetSize.into());
        }
        self.config.target_size = size; self
    }

    /// Read the API token from given file
    /// (unless it's provided through the environment).
    pub fn token_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        if matches!(self.credentials, Some(CredentialsSetup::Custom(_))) {
            return self.err(Error::CredentialsConflict);
        }
        self.credentials = Some(CredentialsSetup::TokenFile(path.into())); self
    }

    /// Set a custom source of API credentials.
    pub fn credentials<C: CredentialSource + 'static>(mut self, source: C) -> Self {
        if matches!(self.credentials, Some(CredentialsSetup::TokenFile(_))) {
            return self.err(Error::CredentialsConflict);
        }
        self.credentials = Some(CredentialsSetup::Custom(Box::new(source))); self
    }

    /// Set a custom resolver of post attachments.
    #[inline]
    pub fn media_resolver<M: MediaResolver + 'static>(mut self, resolver: M) -> Self {
        self.media_resolver = Some(Box::new(resolver)); self
    }

    /// Recognize an additional shape of links,
    /// after all the standard ones.
    #[inline]
    pub fn link_matcher<L: LinkMatcher + 'static>(mut self, matcher: L) -> Self {
        self.link_matchers.push(Box::new(matcher)); self
    }

    /// Set a custom fetcher of images.
    #[inline]
    pub fn fetcher<F: ImageFetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetcher = Some(Box::new(fetcher)); self
    }

    /// Set a custom host for uploading the prepared images.
    #[inline]
    pub fn image_host<H: ImageHost + 'static>(mut self, host: H) -> Self {
        self.image_host = Some(Box::new(host)); self
    }

    /// Set a custom meme renderer.
    #[inline]
    pub fn renderer<R: MemeRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Box::new(renderer)); self
    }
}

// Validation & building.
impl Builder {
    /// Build the `Engine`.
    pub fn build(mut self) -> Result<Engine, Error> {
        self.check_errors()?;
        let config = self.config;

        let http = HttpClient::new(config.timeout).map_err(Error::Http)?;
        let credentials: Box<dyn CredentialSource> = match self.credentials {
            Some(CredentialsSetup::Custom(source)) => source,
            Some(CredentialsSetup::TokenFile(path)) => Box::new(default_credentials(TokenFile::new(path))),
            None => Box::new(default_credentials(TokenFile::default())),
        };
        let media_resolver = self.media_resolver
            .unwrap_or_else(|| Box::new(TwitterApi::new(http.clone())));
        let mut matchers = default_matchers();
        matchers.extend(self.link_matchers);
        let resolver = Resolver::with_matchers(media_resolver, credentials, matchers);

        let fetcher = self.fetcher.unwrap_or_else(|| Box::new(http.clone()));
        let host = self.image_host.unwrap_or_else(|| Box::new(Catbox::new(http)));
        let renderer = self.renderer.unwrap_or_else(|| Box::new(Memegen::new()));
        Ok(Engine::from(Inner{config, resolver, fetcher, host, renderer}))
    }
}

fn default_credentials(file: TokenFile) -> CredentialChain {
    CredentialChain::new().then(EnvToken::default()).then(file)
}

// Utilities for validation & building.
impl Builder {
    #[doc(hidden)]
    fn check_errors(&mut self) -> Result<(), Error> {
        if let Err(e) = self.config.validate() {
            self.errors.push(e.into());
        }
        match self.errors.drain(..).next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    #[doc(hidden)]
    fn err(mut self, error: Error) -> Self {
        self.errors.push(error); self
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Builder")
            .field("errors", &self.errors)
            .field("config", &self.config)
            .field("custom_media_resolver", &self.media_resolver.is_some())
            .field("link_matchers", &self.link_matchers)
            .field("custom_fetcher", &self.fetcher.is_some())
            .field("custom_image_host", &self.image_host.is_some())
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}


/// Error that resulted from misconfiguration of the `Engine` via its `Builder`.
#[derive(Debug)]
pub enum Error {
    /// Invalid configuration value.
    Config(ConfigError),
    /// Both a token file and a custom credential source were given.
    CredentialsConflict,
    /// The HTTP client couldn't be created.
    Http(reqwest::Error),
}

impl From<ConfigError> for Error {
    fn from(input: ConfigError) -> Self {
        Error::Config(input)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Config(ref e) => Some(e),
            Error::CredentialsConflict => None,
            Error::Http(ref e) => Some(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Config(ref e) => write!(fmt, "invalid configuration: {}", e),
            Error::CredentialsConflict => write!(fmt,
                "both a token file and a custom credential source have been configured"),
            Error::Http(ref e) => write!(fmt, "cannot create HTTP client: {}", e),
        }
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use spectral::prelude::*;
    use crate::resolve::StaticToken;
    use super::super::ConfigError;
    use super::{Builder, Error};

    #[test]
    fn defaults() {
        let engine = Builder::new().build().unwrap();
        assert_eq!(15, engine.config().padding);
        assert_eq!(600, engine.config().target_size);
    }

    #[test]
    fn first_error_is_reported() {
        let result = Builder::new()
            .target_size(0)
            .timeout(Duration::from_secs(0))
            .build();
        match result {
            Err(Error::Config(ConfigError::ZeroTargetSize)) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn padding_too_large() {
        let result = Builder::new().target_size(100).padding(50).build();
        match result {
            Err(Error::Config(ConfigError::PaddingTooLarge{padding: 50, target_size: 100})) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn credentials_conflict() {
        let result = Builder::new()
            .credentials(StaticToken::new("abc"))
            .token_file("/tmp/token")
            .build();
        assert_that!(result.map(|_| ())).is_err();

        let result = Builder::new()
            .token_file("/tmp/token")
            .token_file("/tmp/other")
            .build();
        assert_that!(result.map(|_| ())).is_ok();
    }
}
