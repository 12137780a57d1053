//! Link resolution error.

use std::error::Error;
use std::fmt;

use crate::remote::UpstreamError;
use super::credentials::CredentialError;


/// Error that may occur while resolving a link to a direct image URL.
#[derive(Debug)]
pub enum ResolveError {
    /// The link doesn't match any known shape.
    UnrecognizedLink(String),
    /// Credentials needed to call the platform's API are not configured.
    CredentialMissing(CredentialError),
    /// Call to the media resolution API has failed.
    UpstreamResolution(UpstreamError),
    /// The link points at an attachment the post doesn't have.
    AttachmentIndex(AttachmentIndexError),
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ResolveError::UnrecognizedLink(_) => None,
            ResolveError::CredentialMissing(ref e) => Some(e),
            ResolveError::UpstreamResolution(ref e) => Some(e),
            ResolveError::AttachmentIndex(ref e) => Some(e),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ResolveError::UnrecognizedLink(ref l) =>
                write!(fmt, "link not recognised as an image: {}", l),
            ResolveError::CredentialMissing(ref e) =>
                write!(fmt, "missing API credentials: {}", e),
            ResolveError::UpstreamResolution(ref e) =>
                write!(fmt, "cannot resolve the linked post: {}", e),
            ResolveError::AttachmentIndex(ref e) => write!(fmt, "invalid attachment: {}", e),
        }
    }
}

impl From<CredentialError> for ResolveError {
    fn from(input: CredentialError) -> Self {
        ResolveError::CredentialMissing(input)
    }
}
impl From<UpstreamError> for ResolveError {
    fn from(input: UpstreamError) -> Self {
        ResolveError::UpstreamResolution(input)
    }
}
impl From<AttachmentIndexError> for ResolveError {
    fn from(input: AttachmentIndexError) -> Self {
        ResolveError::AttachmentIndex(input)
    }
}


/// Error for links to attachments that don't exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentIndexError {
    /// The link's attachment number cannot refer to any attachment (e.g. `photo/0`).
    InvalidNumber(String),
    /// The post has fewer attachments than needed.
    OutOfRange {
        /// Zero-based index that has been requested.
        index: usize,
        /// Number of attachments the post actually has.
        count: usize,
    },
}

impl Error for AttachmentIndexError {}

impl fmt::Display for AttachmentIndexError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AttachmentIndexError::InvalidNumber(ref n) =>
                write!(fmt, "`{}` is not a valid photo number (they start at 1)", n),
            AttachmentIndexError::OutOfRange{index, count} =>
                write!(fmt, "photo #{} requested but the post has {} attached",
                    index + 1, count),
        }
    }
}
