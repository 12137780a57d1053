//! Module with the blocking HTTP client shared by the remote services.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};

use super::{ImageFetcher, UpstreamError};


lazy_static! {
    static ref USER_AGENT: String = format!("{}/{}",
        option_env!("CARGO_PKG_NAME").unwrap_or("memer"),
        option_env!("CARGO_PKG_VERSION").unwrap_or("0"));
}


/// HTTP client with a fixed timeout for every request.
///
/// *Note*: `HttpClient` implements `Clone`
/// by merely cloning a shared reference to the connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose every request times out after given duration.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT.as_str())
            .build()?;
        Ok(HttpClient{client, timeout})
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl HttpClient {
    #[inline]
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    #[inline]
    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Send the request and ensure it has been responded to successfully.
    pub(crate) fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, UpstreamError> {
        let response = request.send().map_err(|e| UpstreamError::from_reqwest(url, e))?;
        let status = response.status();
        trace!("{} responded with {}", url, status);
        if !status.is_success() {
            return Err(UpstreamError::Status(url.to_owned(), status.as_u16()));
        }
        Ok(response)
    }
}

impl ImageFetcher for HttpClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        info!("Downloading image from {}", url);
        let response = self.send(url, self.get(url))?;
        let bytes = response.bytes().map_err(|e| UpstreamError::from_reqwest(url, e))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
