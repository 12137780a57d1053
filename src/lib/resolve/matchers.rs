//! Module implementing the grammar of recognized links.
//!
//! Each `LinkMatcher` knows a single shape of link and the fields it carries.
//! Matchers are tried in order until one of them claims the link.

use std::fmt;

use url::{ParseError, Url};

use crate::model::constants::IMAGE_EXTENSIONS;
use super::error::{AttachmentIndexError, ResolveError};
use super::link::{LinkReference, Platform, PostReference};


/// Recognizer of one particular shape of links.
pub trait LinkMatcher {
    /// Short description of the links this matcher recognizes, for logging.
    fn describe(&self) -> &'static str;

    /// Try to parse the link.
    ///
    /// Returns `None` if the link isn't of this matcher's shape at all,
    /// so that the next matcher can be tried.
    /// An error means the link is of this shape but it's malformed.
    fn match_link(&self, link: &str) -> Option<Result<LinkReference, ResolveError>>;
}

impl fmt::Debug for dyn LinkMatcher {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "LinkMatcher({})", self.describe())
    }
}


/// The list of matchers for all supported links, in the order they should be tried.
pub fn default_matchers() -> Vec<Box<dyn LinkMatcher>> {
    vec![
        Box::new(DirectImageMatcher::default()),
        Box::new(TwimgMediaMatcher::default()),
        Box::new(TweetMatcher),
    ]
}


/// Matcher for links that point directly at image files,
/// as judged by the extension of their last path segment.
#[derive(Clone, Debug)]
pub struct DirectImageMatcher {
    extensions: Vec<String>,
}

impl DirectImageMatcher {
    /// Create a matcher which accepts files with any of given extensions.
    /// Extensions are compared case-insensitively.
    pub fn for_extensions<I, S>(extensions: I) -> Self
        where I: IntoIterator<Item=S>, S: ToString
    {
        DirectImageMatcher{
            extensions: extensions.into_iter()
                .map(|e| e.to_string().trim().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    #[inline]
    fn is_image_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

impl Default for DirectImageMatcher {
    fn default() -> Self {
        Self::for_extensions(IMAGE_EXTENSIONS)
    }
}

impl LinkMatcher for DirectImageMatcher {
    fn describe(&self) -> &'static str { "direct image link" }

    fn match_link(&self, link: &str) -> Option<Result<LinkReference, ResolveError>> {
        let path = link.split(|c| c == '?' || c == '#').next().unwrap_or(link);
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let dot = file_name.rfind('.')?;
        let (stem, ext) = (&file_name[..dot], &file_name[dot + 1..]);
        if !self.is_image_extension(ext) {
            return None;
        }
        Some(Ok(LinkReference::DirectImage{url: link.to_owned(), name: stem.to_owned()}))
    }
}


/// Matcher for links to Twitter's media CDN which specify
/// the image format in the query string, e.g.:
///
/// `https://pbs.twimg.com/media/FooBar123?format=jpg&name=large`
#[derive(Clone, Debug)]
pub struct TwimgMediaMatcher {
    formats: DirectImageMatcher,
}

impl Default for TwimgMediaMatcher {
    fn default() -> Self {
        TwimgMediaMatcher{formats: DirectImageMatcher::default()}
    }
}

impl LinkMatcher for TwimgMediaMatcher {
    fn describe(&self) -> &'static str { "twimg.com media link" }

    fn match_link(&self, link: &str) -> Option<Result<LinkReference, ResolveError>> {
        let url = parse_web_url(link)?;
        if url.host_str()? != "pbs.twimg.com" {
            return None;
        }
        let segments: Vec<_> = url.path_segments()?.collect();
        let id = match segments.as_slice() {
            ["media", id] if !id.is_empty() => *id,
            _ => return None,
        };
        let format = url.query_pairs().find(|(k, _)| k == "format").map(|(_, v)| v)?;
        if !self.formats.is_image_extension(&format) {
            return None;
        }
        Some(Ok(LinkReference::DirectImage{url: link.to_owned(), name: id.to_owned()}))
    }
}


/// Domains that serve tweets, including the embed proxies.
/// Any subdomain of these (`www.`, `mobile.`, ...) is accepted as well.
const TWITTER_DOMAINS: &[&str] = &[
    "twitter.com", "x.com",
    "fxtwitter.com", "vxtwitter.com", "fixupx.com",
];

fn is_twitter_host(host: &str) -> bool {
    TWITTER_DOMAINS.iter().any(|domain| {
        host == *domain || (host.ends_with(domain)
            && host[..host.len() - domain.len()].ends_with('.'))
    })
}

/// Matcher for links to tweets, optionally pointing at one of their photos:
///
/// * `https://twitter.com/{user}/status/{id}`
/// * `https://twitter.com/{user}/status/{id}/photo/{number}`
///
/// Query string and fragment are ignored.
#[derive(Clone, Copy, Debug)]
pub struct TweetMatcher;

impl LinkMatcher for TweetMatcher {
    fn describe(&self) -> &'static str { "tweet link" }

    fn match_link(&self, link: &str) -> Option<Result<LinkReference, ResolveError>> {
        let url = parse_web_url(link)?;
        let host = url.host_str()?.to_lowercase();
        if !is_twitter_host(&host) {
            return None;
        }
        Some(parse_tweet_path(link, &url))
    }
}

fn parse_tweet_path(link: &str, url: &Url) -> Result<LinkReference, ResolveError> {
    let unrecognized = || ResolveError::UnrecognizedLink(link.to_owned());

    let mut segments: Vec<_> = url.path_segments().ok_or_else(unrecognized)?.collect();
    if segments.last() == Some(&"") {
        segments.pop();  // trailing slash
    }

    let post = match segments.as_slice() {
        [user, "status", id] => {
            if !is_handle(user) || !is_numeric(id) {
                return Err(unrecognized());
            }
            PostReference::new(Platform::Twitter, *user, *id)
        }
        [user, "status", id, "photo", number] => {
            if !is_handle(user) || !is_numeric(id) || !is_numeric(number) {
                return Err(unrecognized());
            }
            let invalid_number = || AttachmentIndexError::InvalidNumber((*number).to_owned());
            let number: usize = number.parse().map_err(|_| invalid_number())?;
            PostReference::with_number(Platform::Twitter, *user, *id, number)
                .ok_or_else(invalid_number)?
        }
        _ => return Err(unrecognized()),
    };
    Ok(LinkReference::SocialPost(post))
}

#[inline]
fn is_handle(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[inline]
fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}


/// Parse a http(s) URL, allowing the scheme to be omitted.
fn parse_web_url(link: &str) -> Option<Url> {
    let url = match Url::parse(link) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) =>
            Url::parse(&format!("https://{}", link)).ok()?,
        Err(_) => return None,
    };
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}
