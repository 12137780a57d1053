//! Module implementing media resolution,
//! i.e. finding the URLs of images attached to a post.


use crate::model::constants::TWITTER_API_TWEETS_URL;
use crate::remote::{HttpClient, UpstreamError};
use super::credentials::BearerToken;
use super::link::PostReference;


/// Lookup of a post's attachments.
pub trait MediaResolver {
    /// Return the URLs of all media attached to the post, in the order they're shown.
    fn attachment_urls(&self, post: &PostReference,
                       token: &BearerToken) -> Result<Vec<String>, UpstreamError>;
}

impl<T: MediaResolver + ?Sized> MediaResolver for Box<T> {
    fn attachment_urls(&self, post: &PostReference,
                       token: &BearerToken) -> Result<Vec<String>, UpstreamError> {
        (**self).attachment_urls(post, token)
    }
}


/// Media resolver using the Twitter v2 API.
#[derive(Clone, Debug)]
pub struct TwitterApi {
    http: HttpClient,
    tweets_url: String,
}

impl TwitterApi {
    #[inline]
    pub fn new(http: HttpClient) -> Self {
        Self::with_tweets_url(http, TWITTER_API_TWEETS_URL)
    }

    /// Create `TwitterApi` that looks up tweets at a different endpoint.
    #[inline]
    pub fn with_tweets_url<S: Into<String>>(http: HttpClient, tweets_url: S) -> Self {
        TwitterApi{http, tweets_url: tweets_url.into()}
    }
}

impl MediaResolver for TwitterApi {
    fn attachment_urls(&self, post: &PostReference,
                       token: &BearerToken) -> Result<Vec<String>, UpstreamError> {
        debug!("Tweet id is {}", post.post_id());
        info!("Requesting image url from twitter");

        let url = self.tweets_url.as_str();
        let request = self.http.get(url)
            .bearer_auth(token.secret())
            .query(&[("ids", post.post_id()),
                     ("expansions", "attachments.media_keys"),
                     ("media.fields", "url,preview_image_url,type")]);
        let response = self.http.send(url, request)?;
        let body = response.text().map_err(|e| UpstreamError::from_reqwest(url, e))?;
        trace!("Tweet lookup response: {}", body);

        let parsed: TweetsResponse = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::malformed(url, e))?;
        let urls = parsed.attachment_urls(url, post.post_id())?;
        debug!("Tweet {} has {} media attachment(s)", post.post_id(), urls.len());
        Ok(urls)
    }
}


// Subset of the response to GET /2/tweets that is of interest here.

#[derive(Debug, Deserialize)]
struct TweetsResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Includes,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    #[serde(default)]
    attachments: Attachments,
}

#[derive(Debug, Default, Deserialize)]
struct Attachments {
    #[serde(default)]
    media_keys: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    media_key: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    url: Option<String>,
    preview_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    title: Option<String>,
    detail: Option<String>,
}

impl TweetsResponse {
    /// Pick the URLs of the tweet's media, in the order of its `media_keys`.
    fn attachment_urls(self, url: &str, post_id: &str) -> Result<Vec<String>, UpstreamError> {
        let tweet = match self.data.iter().find(|t| t.id == post_id) {
            Some(t) => t,
            None => {
                let message = self.errors.first()
                    .and_then(|e| e.detail.clone().or_else(|| e.title.clone()));
                return Err(match message {
                    Some(m) => UpstreamError::Api(url.to_owned(), m),
                    None => UpstreamError::malformed(url,
                        format!("tweet {} missing from the response", post_id)),
                });
            }
        };

        let media = &self.includes.media;
        tweet.attachments.media_keys.iter().map(|key| {
            let m = media.iter().find(|m| &m.media_key == key).ok_or_else(|| {
                UpstreamError::malformed(url, format!("no details of media `{}`", key))
            })?;
            // Videos and GIFs have no `url`, just the thumbnail.
            m.url.clone().or_else(|| m.preview_image_url.clone()).ok_or_else(|| {
                UpstreamError::malformed(url, format!("no URL for {} media `{}`",
                    m.kind.as_ref().map(|k| k.as_str()).unwrap_or("unknown"), key))
            })
        }).collect()
    }
}
