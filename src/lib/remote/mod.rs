//! Module with the remote services the pipeline talks to.
//!
//! Each service sits behind a small trait, so that the `Engine`
//! can be assembled with different implementations (e.g. in tests).

mod catbox;
mod error;
mod http;
mod memegen;

pub use self::catbox::Catbox;
pub use self::error::UpstreamError;
pub use self::http::HttpClient;
pub use self::memegen::Memegen;


/// Fetcher of raw image bytes from a URL.
pub trait ImageFetcher {
    /// Download the content at given URL.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError>;
}

/// Host where images can be uploaded to obtain a publicly reachable URL.
pub trait ImageHost {
    /// Upload PNG-encoded image and return its URL.
    fn upload(&self, png: &[u8]) -> Result<String, UpstreamError>;
}

/// Service rendering the captioned composite image.
pub trait MemeRenderer {
    /// Construct the URL where a meme with given background and captions
    /// can be fetched from.
    ///
    /// The captions are given as raw text; escaping them is up to the renderer.
    fn meme_url(&self, background: &str,
                top_text: &str, bottom_text: &str) -> Result<String, UpstreamError>;
}


impl<T: ImageFetcher + ?Sized> ImageFetcher for Box<T> {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        (**self).fetch(url)
    }
}

impl<T: ImageHost + ?Sized> ImageHost for Box<T> {
    fn upload(&self, png: &[u8]) -> Result<String, UpstreamError> {
        (**self).upload(png)
    }
}

impl<T: MemeRenderer + ?Sized> MemeRenderer for Box<T> {
    fn meme_url(&self, background: &str,
                top_text: &str, bottom_text: &str) -> Result<String, UpstreamError> {
        (**self).meme_url(background, top_text, bottom_text)
    }
}
