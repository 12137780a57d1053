//! Module defining the references parsed out of input links,
//! and the result of resolving them.

use std::fmt;


macro_attr! {
    /// Platform hosting the posts that can be linked to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IterVariants!(Platforms))]
    pub enum Platform {
        Twitter,
    }
}

impl Platform {
    /// Short name of the platform, as used in the generated file names.
    #[inline]
    pub fn name(&self) -> &'static str {
        match *self {
            Platform::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.name())
    }
}


/// Identity of the image an input link refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkReference {
    /// Link pointing directly at an image file.
    DirectImage {
        /// The link itself, exactly as given.
        url: String,
        /// File name from the link, without the extension.
        name: String,
    },
    /// Link to a post with image attachment(s).
    SocialPost(PostReference),
}


/// Reference to a particular attachment of a social media post.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PostReference {
    platform: Platform,
    user_handle: String,
    post_id: String,
    attachment_index: usize,
    numbered: bool,
}

impl PostReference {
    /// Reference to the first attachment of a post,
    /// for links that don't point at any attachment in particular.
    pub fn new<U, P>(platform: Platform, user_handle: U, post_id: P) -> Self
        where U: Into<String>, P: Into<String>
    {
        PostReference{
            platform,
            user_handle: user_handle.into(),
            post_id: post_id.into(),
            attachment_index: 0,
            numbered: false,
        }
    }

    /// Reference to an attachment which the link gives the 1-based number of.
    ///
    /// Returns `None` if the number is zero.
    pub fn with_number<U, P>(platform: Platform, user_handle: U, post_id: P,
                             number: usize) -> Option<Self>
        where U: Into<String>, P: Into<String>
    {
        let attachment_index = number.checked_sub(1)?;
        Some(PostReference{
            attachment_index,
            numbered: true,
            ..Self::new(platform, user_handle, post_id)
        })
    }
}

impl PostReference {
    #[inline]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[inline]
    pub fn user_handle(&self) -> &str {
        &self.user_handle
    }

    #[inline]
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Zero-based position of the attachment among those of the post.
    #[inline]
    pub fn attachment_index(&self) -> usize {
        self.attachment_index
    }

    /// Number of the attachment as it appeared in the link,
    /// or zero if the link didn't point at a specific one.
    #[inline]
    pub fn attachment_number(&self) -> usize {
        if self.numbered { self.attachment_index + 1 } else { 0 }
    }

    /// Base file name for the image, e.g. `alice_twitter_12345_2`.
    pub fn suggested_name(&self) -> String {
        format!("{}_{}_{}_{}", self.user_handle, self.platform.name(),
            self.post_id, self.attachment_number())
    }
}


/// Image which an input link has been resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    direct_url: String,
    suggested_name: String,
}

impl ResolvedImage {
    /// Create a `ResolvedImage`.
    ///
    /// The name is sanitized so that it can be safely used as a file name.
    pub fn new<U: Into<String>, N: AsRef<str>>(direct_url: U, suggested_name: N) -> Self {
        ResolvedImage{
            direct_url: direct_url.into(),
            suggested_name: sanitize_name(suggested_name.as_ref()),
        }
    }

    /// URL the image bytes can be fetched from.
    #[inline]
    pub fn direct_url(&self) -> &str {
        &self.direct_url
    }

    /// Base name for a file holding the image, without the extension.
    #[inline]
    pub fn suggested_name(&self) -> &str {
        &self.suggested_name
    }
}


/// Characters that are removed from file names.
const UNSAFE_NAME_CHARS: &[char] = &['/', '\\', '?', '#', '&', '=', ':', '*', '"', '<', '>', '|'];

/// Make given string safe to use as a base file name.
///
/// Path separators and query string characters are dropped, as are control characters.
/// If nothing is left, the result is `"image"`.
pub fn sanitize_name(name: &str) -> String {
    let result: String = name.trim().chars()
        .filter(|c| !UNSAFE_NAME_CHARS.contains(c) && !c.is_control())
        .collect();
    let result = result.trim_matches('.');
    if result.is_empty() { "image".to_owned() } else { result.to_owned() }
}


#[cfg(test)]
mod tests {
    use super::{Platform, PostReference, ResolvedImage, sanitize_name};

    #[test]
    fn unnumbered_post() {
        let post = PostReference::new(Platform::Twitter, "alice", "12345");
        assert_eq!(0, post.attachment_index());
        assert_eq!(0, post.attachment_number());
        assert_eq!("alice_twitter_12345_0", post.suggested_name());
    }

    #[test]
    fn numbered_post() {
        let post = PostReference::with_number(Platform::Twitter, "alice", "12345", 2).unwrap();
        assert_eq!(1, post.attachment_index());
        assert_eq!(2, post.attachment_number());
        assert_eq!("alice_twitter_12345_2", post.suggested_name());
    }

    #[test]
    fn photo_number_zero() {
        assert_eq!(None, PostReference::with_number(Platform::Twitter, "alice", "12345", 0));
    }

    #[test]
    fn sanitized_names() {
        assert_eq!("bar", sanitize_name("bar"));
        assert_eq!("barbaz", sanitize_name("bar?baz"));
        assert_eq!("etcpasswd", sanitize_name("../etc/passwd"));
        assert_eq!("ab", sanitize_name("a\\b"));
        assert_eq!("image", sanitize_name("?=&"));
        assert_eq!("image", sanitize_name(""));
    }

    #[test]
    fn resolved_image_name_is_sanitized() {
        let image = ResolvedImage::new("https://example.com/x.png", "x?y=1");
        assert_eq!("https://example.com/x.png", image.direct_url());
        assert_eq!("xy1", image.suggested_name());
    }
}
