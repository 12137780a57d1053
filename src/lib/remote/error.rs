//! Error of a remote service call.

use std::error::Error;
use std::fmt;


/// Error that may occur when talking to any of the remote services.
///
/// Every variant carries the URL of the request that failed.
#[derive(Debug)]
pub enum UpstreamError {
    /// The request didn't complete within the configured timeout.
    Timeout(String),
    /// Connection or other transport-level failure.
    Transport(String, reqwest::Error),
    /// Server responded with a non-success HTTP status.
    Status(String, u16),
    /// Response didn't have the expected shape.
    Malformed(String, String),
    /// Remote API responded with an error of its own.
    Api(String, String),
}

impl UpstreamError {
    /// Classify an error coming from the HTTP client.
    pub(crate) fn from_reqwest<U: Into<String>>(url: U, error: reqwest::Error) -> Self {
        let url = url.into();
        if error.is_timeout() {
            UpstreamError::Timeout(url)
        } else if error.is_decode() {
            UpstreamError::Malformed(url, error.to_string())
        } else if let Some(status) = error.status() {
            UpstreamError::Status(url, status.as_u16())
        } else {
            UpstreamError::Transport(url, error)
        }
    }

    #[inline]
    pub(crate) fn malformed<U: Into<String>, R: fmt::Display>(url: U, reason: R) -> Self {
        UpstreamError::Malformed(url.into(), reason.to_string())
    }

    /// URL of the request that has failed.
    pub fn url(&self) -> &str {
        match *self {
            UpstreamError::Timeout(ref u) => u,
            UpstreamError::Transport(ref u, _) => u,
            UpstreamError::Status(ref u, _) => u,
            UpstreamError::Malformed(ref u, _) => u,
            UpstreamError::Api(ref u, _) => u,
        }
    }
}

impl Error for UpstreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            UpstreamError::Transport(_, ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UpstreamError::Timeout(ref u) => write!(fmt, "request to {} timed out", u),
            UpstreamError::Transport(ref u, ref e) =>
                write!(fmt, "request to {} failed: {}", u, e),
            UpstreamError::Status(ref u, s) =>
                write!(fmt, "request to {} returned HTTP status {}", u, s),
            UpstreamError::Malformed(ref u, ref r) =>
                write!(fmt, "unexpected response from {}: {}", u, r),
            UpstreamError::Api(ref u, ref m) => write!(fmt, "{} reported an error: {}", u, m),
        }
    }
}
