//! Module defining constants relevant to the data model.

use std::time::Duration;


/// Default top caption.
///
/// A single space rather than an empty string, since memegen needs
/// a non-empty path segment for each caption line.
pub const DEFAULT_TOP_TEXT: &str = " ";
/// Default bottom caption.
pub const DEFAULT_BOTTOM_TEXT: &str = "wow?";

/// Number of pixel rows added above and below the image before rendering,
/// and cropped off again afterwards.
pub const DEFAULT_PADDING: u32 = 15;
/// Size (in pixels) of the shorter side of the image sent for rendering.
pub const DEFAULT_TARGET_SIZE: u32 = 600;

/// Largest number of pixels the padded background image may have.
pub const MAX_BACKGROUND_PIXELS: u64 = 25_000_000;

/// Timeout of every single network request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// File extensions (lowercase, without the dot) of directly linked images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// File the Twitter API bearer token is read from by default.
pub const DEFAULT_TOKEN_FILE: &str = "twitterapitoken";
/// Environment variable that may hold the Twitter API bearer token.
pub const TOKEN_ENV_VAR: &str = "MEMER_TWITTER_TOKEN";

/// Endpoint of the Twitter v2 API used to look up tweets.
pub const TWITTER_API_TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
/// Upload endpoint of the temporary image host.
pub const CATBOX_API_URL: &str = "https://catbox.moe/user/api.php";
/// Base URL of the meme rendering API.
pub const MEMEGEN_BASE_URL: &str = "https://api.memegen.link";

/// Maximum length (in Unicode codepoints) of a single caption text.
pub const MAX_CAPTION_LENGTH: usize = 256;
