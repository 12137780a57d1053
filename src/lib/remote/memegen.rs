//! Module implementing the memegen.link renderer.

use url::Url;

use crate::model::constants::MEMEGEN_BASE_URL;
use super::{MemeRenderer, UpstreamError};


/// Meme renderer at api.memegen.link, using a custom background image.
#[derive(Clone, Debug)]
pub struct Memegen {
    base_url: Url,
}

impl Memegen {
    #[inline]
    pub fn new() -> Self {
        Memegen{base_url: Url::parse(MEMEGEN_BASE_URL).expect("valid memegen base URL")}
    }

    /// Create `Memegen` pointed at a different deployment of the API.
    #[inline]
    pub fn with_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Memegen{base_url: Url::parse(base_url)?})
    }
}

impl Default for Memegen {
    fn default() -> Self {
        Self::new()
    }
}

impl MemeRenderer for Memegen {
    fn meme_url(&self, background: &str,
                top_text: &str, bottom_text: &str) -> Result<String, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UpstreamError::malformed(self.base_url.as_str(), "not a valid base URL")
            })?;
            segments.pop_if_empty()
                .push("images").push("custom")
                .push(&escape_text(top_text))
                .push(&format!("{}.png", escape_text(bottom_text)));
        }
        url.query_pairs_mut().append_pair("background", background);

        debug!("Meme link at {}", url);
        Ok(url.into())
    }
}


/// Escape caption text according to memegen's rules for URL path segments.
///
/// Whatever is left after that is percent-encoded by `Url` itself.
fn escape_text(text: &str) -> String {
    if text.is_empty() {
        return "_".to_owned();
    }
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '_' => result.push_str("__"),
            '-' => result.push_str("--"),
            ' ' => result.push('_'),
            '\n' => result.push_str("~n"),
            '?' => result.push_str("~q"),
            '&' => result.push_str("~a"),
            '%' => result.push_str("~p"),
            '#' => result.push_str("~h"),
            '/' => result.push_str("~s"),
            '\\' => result.push_str("~b"),
            '<' => result.push_str("~l"),
            '>' => result.push_str("~g"),
            '"' => result.push_str("''"),
            c => result.push(c),
        }
    }
    result
}
