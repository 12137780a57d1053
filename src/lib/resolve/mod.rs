//! Module implementing link resolution:
//! turning a link given by the user into a direct image URL.

mod credentials;
mod error;
mod link;
mod matchers;
mod media;


pub use self::credentials::{BearerToken,
                            CredentialChain,
                            CredentialError,
                            CredentialSource,
                            EnvToken,
                            StaticToken,
                            TokenFile};
pub use self::error::{AttachmentIndexError, ResolveError};
pub use self::link::{LinkReference, Platform, PostReference, ResolvedImage, sanitize_name};
pub use self::matchers::{default_matchers,
                         DirectImageMatcher,
                         LinkMatcher,
                         TweetMatcher,
                         TwimgMediaMatcher};
pub use self::media::{MediaResolver, TwitterApi};


use std::fmt;


/// Resolver of links into direct image URLs.
///
/// Links are first parsed with a list of `LinkMatcher`s.
/// Links to posts are then looked up with the `MediaResolver`,
/// using credentials from the `CredentialSource`.
pub struct Resolver<M = TwitterApi, C = CredentialChain>
    where M: MediaResolver, C: CredentialSource
{
    matchers: Vec<Box<dyn LinkMatcher>>,
    media: M,
    credentials: C,
}

impl<M, C> Resolver<M, C>
    where M: MediaResolver, C: CredentialSource
{
    /// Create a `Resolver` that recognizes all supported links.
    #[inline]
    pub fn new(media: M, credentials: C) -> Self {
        Self::with_matchers(media, credentials, default_matchers())
    }

    /// Create a `Resolver` that only recognizes links accepted by given matchers.
    #[inline]
    pub fn with_matchers(media: M, credentials: C,
                         matchers: Vec<Box<dyn LinkMatcher>>) -> Self {
        Resolver{matchers, media, credentials}
    }

    /// Recognize an additional shape of links.
    ///
    /// The new matcher is tried after all the existing ones.
    #[inline]
    pub fn matcher<L: LinkMatcher + 'static>(mut self, matcher: L) -> Self {
        self.matchers.push(Box::new(matcher)); self
    }
}

impl<M, C> Resolver<M, C>
    where M: MediaResolver, C: CredentialSource
{
    /// Parse the link without resolving it.
    pub fn parse(&self, link: &str) -> Result<LinkReference, ResolveError> {
        let link = link.trim();
        for matcher in &self.matchers {
            if let Some(result) = matcher.match_link(link) {
                trace!("Link {} claimed by {} matcher", link, matcher.describe());
                return result;
            }
        }
        Err(ResolveError::UnrecognizedLink(link.to_owned()))
    }

    /// Resolve the link into a URL of the image and a name for it.
    ///
    /// Links to posts require a call to the media resolution API,
    /// while direct image links are returned as they are.
    pub fn resolve(&self, link: &str) -> Result<ResolvedImage, ResolveError> {
        match self.parse(link)? {
            LinkReference::DirectImage{url, name} => {
                debug!("Link {} points directly at image `{}`", url, name);
                Ok(ResolvedImage::new(url, name))
            }
            LinkReference::SocialPost(post) => self.resolve_post(&post),
        }
    }

    fn resolve_post(&self, post: &PostReference) -> Result<ResolvedImage, ResolveError> {
        debug!("Link points at {} post {} by {} (attachment #{})",
            post.platform(), post.post_id(), post.user_handle(), post.attachment_index());

        let token = self.credentials.bearer_token()?;
        let urls = self.media.attachment_urls(post, &token)?;

        let count = urls.len();
        let index = post.attachment_index();
        let url = urls.into_iter().nth(index)
            .ok_or(AttachmentIndexError::OutOfRange{index, count})?;

        info!("Direct link to {} image is {}", post.platform(), url);
        Ok(ResolvedImage::new(url, post.suggested_name()))
    }
}

impl<M, C> fmt::Debug for Resolver<M, C>
    where M: MediaResolver + fmt::Debug, C: CredentialSource + fmt::Debug
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Resolver")
            .field("matchers", &self.matchers)
            .field("media", &self.media)
            .field("credentials", &self.credentials)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use proptest::prelude::*;
    use spectral::prelude::*;

    use crate::remote::UpstreamError;
    use super::*;

    /// Media resolver that returns a fixed list of URLs and records its calls.
    struct FakeMedia {
        urls: Vec<String>,
        fail: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeMedia {
        fn with_urls(urls: &[&str]) -> Self {
            FakeMedia{
                urls: urls.iter().map(|u| u.to_string()).collect(),
                fail: false,
                calls: RefCell::new(vec![]),
            }
        }

        fn failing() -> Self {
            FakeMedia{fail: true, ..Self::with_urls(&[])}
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl MediaResolver for FakeMedia {
        fn attachment_urls(&self, post: &PostReference,
                           token: &BearerToken) -> Result<Vec<String>, UpstreamError> {
            assert_eq!("token", token.secret());
            self.calls.borrow_mut().push(post.post_id().to_owned());
            if self.fail {
                return Err(UpstreamError::Timeout("https://api.example/2/tweets".into()));
            }
            Ok(self.urls.clone())
        }
    }

    fn resolver(media: FakeMedia) -> Resolver<FakeMedia, StaticToken> {
        Resolver::new(media, StaticToken::new("token"))
    }

    const PHOTOS: &[&str] = &["https://pbs.twimg.com/media/A.jpg",
                              "https://pbs.twimg.com/media/B.jpg"];

    #[test]
    fn direct_image() {
        let resolver = resolver(FakeMedia::with_urls(&[]));
        let image = resolver.resolve("https://example.com/foo/bar.PNG").unwrap();
        assert_eq!("https://example.com/foo/bar.PNG", image.direct_url());
        assert_eq!("bar", image.suggested_name());
        assert_eq!(0, resolver.media.call_count());
    }

    #[test]
    fn direct_image_needs_no_credentials() {
        let resolver = Resolver::new(FakeMedia::with_urls(&[]), StaticToken::none());
        assert_that!(resolver.resolve("https://example.com/a.jpg")).is_ok();
    }

    #[test]
    fn tweet_first_photo() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        let image = resolver.resolve("https://twitter.com/alice/status/12345").unwrap();
        assert_eq!(PHOTOS[0], image.direct_url());
        assert_eq!("alice_twitter_12345_0", image.suggested_name());
        assert_eq!(vec!["12345".to_owned()], *resolver.media.calls.borrow());
    }

    #[test]
    fn tweet_numbered_photo() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        let image = resolver.resolve("https://twitter.com/alice/status/12345/photo/2").unwrap();
        assert_eq!(PHOTOS[1], image.direct_url());
        assert_eq!("alice_twitter_12345_2", image.suggested_name());
    }

    #[test]
    fn tweet_photo_out_of_range() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        match resolver.resolve("https://twitter.com/alice/status/12345/photo/3") {
            Err(ResolveError::AttachmentIndex(AttachmentIndexError::OutOfRange{index, count})) => {
                assert_eq!(2, index);
                assert_eq!(2, count);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(1, resolver.media.call_count());
    }

    #[test]
    fn tweet_without_photos() {
        let resolver = resolver(FakeMedia::with_urls(&[]));
        match resolver.resolve("https://twitter.com/alice/status/12345") {
            Err(ResolveError::AttachmentIndex(AttachmentIndexError::OutOfRange{index: 0, count: 0})) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn tweet_photo_zero_makes_no_calls() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        match resolver.resolve("https://twitter.com/alice/status/12345/photo/0") {
            Err(ResolveError::AttachmentIndex(AttachmentIndexError::InvalidNumber(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(0, resolver.media.call_count());
    }

    #[test]
    fn missing_credentials_make_no_calls() {
        let resolver = Resolver::new(FakeMedia::with_urls(PHOTOS), StaticToken::none());
        match resolver.resolve("https://twitter.com/alice/status/12345") {
            Err(ResolveError::CredentialMissing(ref e)) => assert!(e.is_missing()),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(0, resolver.media.call_count());
    }

    #[test]
    fn upstream_failure() {
        let resolver = resolver(FakeMedia::failing());
        match resolver.resolve("https://twitter.com/alice/status/12345") {
            Err(ResolveError::UpstreamResolution(UpstreamError::Timeout(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unrecognized_link() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        for link in &["https://example.com/notanimage", "", "   ", "not even a link"] {
            match resolver.resolve(link) {
                Err(ResolveError::UnrecognizedLink(_)) => {}
                other => panic!("unexpected result for {:?}: {:?}", link, other),
            }
        }
        assert_eq!(0, resolver.media.call_count());
    }

    #[test]
    fn input_is_trimmed() {
        let resolver = resolver(FakeMedia::with_urls(PHOTOS));
        let image = resolver.resolve("  https://example.com/a.png\n").unwrap();
        assert_eq!("https://example.com/a.png", image.direct_url());
    }

    #[test]
    fn additional_matcher() {
        struct Everything;
        impl LinkMatcher for Everything {
            fn describe(&self) -> &'static str { "anything" }
            fn match_link(&self, link: &str) -> Option<Result<LinkReference, ResolveError>> {
                Some(Ok(LinkReference::DirectImage{url: link.into(), name: "any".into()}))
            }
        }

        let resolver = resolver(FakeMedia::with_urls(&[])).matcher(Everything);
        let image = resolver.resolve("https://example.com/notanimage").unwrap();
        assert_eq!("any", image.suggested_name());
        // Built-in matchers still take precedence.
        let image = resolver.resolve("https://example.com/cat.png").unwrap();
        assert_eq!("cat", image.suggested_name());
    }

    proptest! {
        #[test]
        fn direct_images_resolve_idempotently(
            dir in "[a-z0-9/]{0,12}",
            stem in "[A-Za-z0-9_.-]{1,16}",
            ext in "(png|jpg|jpeg|PNG|JPG|Jpeg)",
            query in "(\\?[a-z]=[a-z0-9/]{1,8})?",
        ) {
            let link = format!("https://example.com/{}/{}.{}{}", dir, stem, ext, query);
            let resolver = resolver(FakeMedia::with_urls(&[]));

            let first = resolver.resolve(&link).unwrap();
            let second = resolver.resolve(&link).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.direct_url(), link.as_str());
            prop_assert!(!first.suggested_name().contains(|c| c == '/' || c == '?'));
            prop_assert_eq!(resolver.media.call_count(), 0);
        }
    }
}
