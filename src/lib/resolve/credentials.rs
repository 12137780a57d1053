//! Module with the sources of API credentials.

use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::constants::{DEFAULT_TOKEN_FILE, TOKEN_ENV_VAR};


/// Bearer token for an HTTP API.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Create a token from given string, ignoring surrounding whitespace.
    ///
    /// Returns `None` if there's nothing but whitespace.
    pub fn new<S: AsRef<str>>(token: S) -> Option<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() { None } else { Some(BearerToken(token.to_owned())) }
    }

    /// The secret itself.
    #[inline]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "BearerToken(<{} chars>)", self.0.len())
    }
}


/// Source of the bearer token needed to call the media resolution API.
pub trait CredentialSource {
    /// Obtain the token, or report why it's not available.
    fn bearer_token(&self) -> Result<BearerToken, CredentialError>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Box<T> {
    fn bearer_token(&self) -> Result<BearerToken, CredentialError> {
        (**self).bearer_token()
    }
}


/// Error while obtaining credentials.
#[derive(Debug)]
pub enum CredentialError {
    /// No credential has been configured where it was looked for.
    Missing(String),
    /// A credential file exists but cannot be read.
    Unreadable(PathBuf, io::Error),
}

impl CredentialError {
    /// Whether this error just means the credential isn't there,
    /// as opposed to being there but inaccessible.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match *self { CredentialError::Missing(_) => true, _ => false }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CredentialError::Unreadable(_, ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CredentialError::Missing(ref w) => write!(fmt, "no token found in {}", w),
            CredentialError::Unreadable(ref p, ref e) =>
                write!(fmt, "cannot read token file {}: {}", p.display(), e),
        }
    }
}


/// Token read from a file.
#[derive(Clone, Debug)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    #[inline]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TokenFile{path: path.as_ref().to_owned()}
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TokenFile {
    /// Token file in the current directory.
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

impl CredentialSource for TokenFile {
    fn bearer_token(&self) -> Result<BearerToken, CredentialError> {
        trace!("Reading API token from {}", self.path.display());
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CredentialError::Missing(format!("file {}", self.path.display())));
            }
            Err(e) => return Err(CredentialError::Unreadable(self.path.clone(), e)),
        };
        BearerToken::new(content).ok_or_else(|| {
            CredentialError::Missing(format!("file {} (it's empty)", self.path.display()))
        })
    }
}


/// Token taken from an environment variable.
#[derive(Clone, Debug)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    #[inline]
    pub fn new<S: Into<String>>(var: S) -> Self {
        EnvToken{var: var.into()}
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(TOKEN_ENV_VAR)
    }
}

impl CredentialSource for EnvToken {
    fn bearer_token(&self) -> Result<BearerToken, CredentialError> {
        env::var(&self.var).ok()
            .and_then(BearerToken::new)
            .ok_or_else(|| CredentialError::Missing(format!("${}", self.var)))
    }
}


/// Token given up front, or explicitly absent.
#[derive(Clone, Debug)]
pub struct StaticToken(Option<BearerToken>);

impl StaticToken {
    #[inline]
    pub fn new<S: AsRef<str>>(token: S) -> Self {
        StaticToken(BearerToken::new(token))
    }

    #[inline]
    pub fn none() -> Self {
        StaticToken(None)
    }
}

impl CredentialSource for StaticToken {
    fn bearer_token(&self) -> Result<BearerToken, CredentialError> {
        self.0.clone()
            .ok_or_else(|| CredentialError::Missing("the configuration".into()))
    }
}


/// Several credential sources tried in order.
///
/// The first token found is used. A source that fails for a reason other than
/// the token simply not being there stops the search.
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another source to try (after all the previous ones).
    #[inline]
    pub fn then<S: CredentialSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source)); self
    }
}

impl CredentialSource for CredentialChain {
    fn bearer_token(&self) -> Result<BearerToken, CredentialError> {
        let mut places = vec![];
        for source in &self.sources {
            match source.bearer_token() {
                Ok(token) => return Ok(token),
                Err(CredentialError::Missing(where_)) => places.push(where_),
                Err(e) => return Err(e),
            }
        }
        Err(CredentialError::Missing(if places.is_empty() {
            "any configured source".into()
        } else {
            places.join(" or ")
        }))
    }
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("CredentialChain")
            .field("sources", &self.sources.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    use spectral::prelude::*;
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("memer-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn token_is_trimmed() {
        assert_eq!("abc", BearerToken::new("  abc\n").unwrap().secret());
        assert_that!(BearerToken::new(" \n\t")).is_none();
    }

    #[test]
    fn token_debug_hides_secret() {
        let token = BearerToken::new("supersecret").unwrap();
        assert!(!format!("{:?}", token).contains("supersecret"));
    }

    #[test]
    fn token_file_missing() {
        let source = TokenFile::new(temp_path("does-not-exist"));
        let error = source.bearer_token().unwrap_err();
        assert!(error.is_missing());
    }

    #[test]
    fn token_file_present() {
        let path = temp_path("present");
        fs::write(&path, "AAAA%2Fbearer\n").unwrap();
        let token = TokenFile::new(&path).bearer_token();
        fs::remove_file(&path).unwrap();
        assert_eq!("AAAA%2Fbearer", token.unwrap().secret());
    }

    #[test]
    fn token_file_empty() {
        let path = temp_path("empty");
        fs::write(&path, "\n").unwrap();
        let result = TokenFile::new(&path).bearer_token();
        fs::remove_file(&path).unwrap();
        assert!(result.unwrap_err().is_missing());
    }

    #[test]
    fn env_token() {
        let var = format!("MEMER_TEST_TOKEN_{}", std::process::id());
        assert!(EnvToken::new(var.as_str()).bearer_token().unwrap_err().is_missing());
        env::set_var(&var, "from-env");
        let token = EnvToken::new(var.as_str()).bearer_token();
        env::remove_var(&var);
        assert_eq!("from-env", token.unwrap().secret());
    }

    #[test]
    fn chain_uses_first_available() {
        let chain = CredentialChain::new()
            .then(StaticToken::none())
            .then(StaticToken::new("second"))
            .then(StaticToken::new("third"));
        assert_eq!("second", chain.bearer_token().unwrap().secret());
    }

    #[test]
    fn chain_reports_all_places() {
        let chain = CredentialChain::new()
            .then(EnvToken::new("MEMER_TEST_SURELY_UNSET_VAR"))
            .then(TokenFile::new(temp_path("chain-missing")));
        let error = chain.bearer_token().unwrap_err();
        assert!(error.is_missing());
        let message = error.to_string();
        assert!(message.contains("$MEMER_TEST_SURELY_UNSET_VAR"), "{}", message);
        assert!(message.contains("chain-missing"), "{}", message);
    }

    #[test]
    fn empty_chain() {
        assert!(CredentialChain::new().bearer_token().unwrap_err().is_missing());
    }
}
