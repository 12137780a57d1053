//! Module implementing the `MemeSpec` type and its builder.

use std::error;
use std::fmt;

use super::constants::{DEFAULT_BOTTOM_TEXT, DEFAULT_TOP_TEXT, MAX_CAPTION_LENGTH};


/// Describes a meme to make. Used as an input structure.
#[derive(Clone, PartialEq, Eq)]
pub struct MemeSpec {
    /// Link to the background image.
    ///
    /// This can be a direct image URL or a link to a tweet (or one of its photos).
    pub source: String,
    /// Text rendered at the top of the image.
    pub top_text: String,
    /// Text rendered at the bottom of the image.
    pub bottom_text: String,
    /// Base name of the output file, overriding the one derived from `source`.
    pub name: Option<String>,
}

impl MemeSpec {
    /// Create a `MemeSpec` for given source link with the default captions.
    #[inline]
    pub fn new<S: Into<String>>(source: S) -> Self {
        MemeSpec{
            source: source.into(),
            top_text: DEFAULT_TOP_TEXT.to_owned(),
            bottom_text: DEFAULT_BOTTOM_TEXT.to_owned(),
            name: None,
        }
    }
}

impl fmt::Debug for MemeSpec {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut ds = fmt.debug_struct("MemeSpec");
        ds.field("source", &self.source);
        ds.field("top_text", &self.top_text);
        ds.field("bottom_text", &self.bottom_text);
        if let Some(ref name) = self.name {
            ds.field("name", name);
        }
        ds.finish()
    }
}


/// Builder for `MemeSpec`.
#[derive(Debug, Default, PartialEq)]
#[must_use = "unused builder which must be used"]
pub struct Builder {
    source: Option<String>,
    top_text: Option<String>,
    bottom_text: Option<String>,
    name: Option<String>,
}

impl Builder {
    /// Create a new `Builder` for a `MemeSpec`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder {
    /// Set the link to the background image.
    #[inline]
    pub fn source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into()); self
    }

    /// Set the top caption. By default, it's blank.
    #[inline]
    pub fn top_text<S: Into<String>>(mut self, text: S) -> Self {
        self.top_text = Some(text.into()); self
    }

    /// Set the bottom caption.
    #[inline]
    pub fn bottom_text<S: Into<String>>(mut self, text: S) -> Self {
        self.bottom_text = Some(text.into()); self
    }

    /// Override the name of the output file.
    ///
    /// An empty name leaves the default (derived from the source link) in place.
    #[inline]
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        self.name = if name.trim().is_empty() { None } else { Some(name) };
        self
    }
}

impl Builder {
    /// Build the resulting `MemeSpec`.
    pub fn build(self) -> Result<MemeSpec, Error> {
        self.validate()?;
        let source = self.source.ok_or(Error::NoSource)?;
        Ok(MemeSpec{
            source: source.trim().to_owned(),
            top_text: self.top_text.unwrap_or_else(|| DEFAULT_TOP_TEXT.to_owned()),
            bottom_text: self.bottom_text.unwrap_or_else(|| DEFAULT_BOTTOM_TEXT.to_owned()),
            name: self.name,
        })
    }

    #[doc(hidden)]
    fn validate(&self) -> Result<(), Error> {
        if self.source.as_ref().map(|s| s.trim().is_empty()).unwrap_or(true) {
            return Err(Error::NoSource);
        }
        for text in self.top_text.iter().chain(self.bottom_text.iter()) {
            let length = text.chars().count();
            if length > MAX_CAPTION_LENGTH {
                return Err(Error::CaptionTooLong(length));
            }
        }
        Ok(())
    }
}


/// Error while building a `MemeSpec`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// No source link given.
    NoSource,
    /// Caption text too long.
    CaptionTooLong(usize),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoSource => write!(fmt, "no source image link given"),
            Error::CaptionTooLong(l) =>
                write!(fmt, "caption too long: {} > {}", l, MAX_CAPTION_LENGTH),
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::{Builder, Error, MemeSpec};
    use crate::model::constants::MAX_CAPTION_LENGTH;

    #[test]
    fn default_captions() {
        let spec = MemeSpec::new("https://example.com/a.png");
        assert_eq!(" ", spec.top_text);
        assert_eq!("wow?", spec.bottom_text);
        assert_that!(spec.name).is_none();
    }

    #[test]
    fn builder_requires_source() {
        assert_eq!(Err(Error::NoSource), Builder::new().build());
        assert_eq!(Err(Error::NoSource), Builder::new().source("   ").build());
    }

    #[test]
    fn builder_trims_source() {
        let spec = Builder::new().source(" https://example.com/a.png\n").build().unwrap();
        assert_eq!("https://example.com/a.png", spec.source);
    }

    #[test]
    fn empty_name_is_no_override() {
        let spec = Builder::new().source("https://example.com/a.png").name("").build().unwrap();
        assert_that!(spec.name).is_none();
        let spec = Builder::new().source("https://example.com/a.png").name("mine").build().unwrap();
        assert_eq!(Some("mine".to_owned()), spec.name);
    }

    #[test]
    fn caption_too_long() {
        let text: String = "a".repeat(MAX_CAPTION_LENGTH + 1);
        let result = Builder::new().source("https://example.com/a.png").bottom_text(text).build();
        assert_eq!(Err(Error::CaptionTooLong(MAX_CAPTION_LENGTH + 1)), result);
    }

    #[test]
    fn caption_length_counts_characters() {
        let text: String = "ż".repeat(MAX_CAPTION_LENGTH);
        assert_that!(Builder::new().source("https://example.com/a.png").top_text(text).build())
            .is_ok();
    }
}
