//! Module implementing uploads to catbox.moe.

use reqwest::blocking::multipart::{Form, Part};
use url::Url;

use crate::model::constants::CATBOX_API_URL;
use super::{HttpClient, ImageHost, UpstreamError};


/// Name the uploaded file is given. Catbox picks its own name anyway.
const UPLOAD_FILE_NAME: &str = "name.png";


/// Temporary image host at catbox.moe.
#[derive(Clone, Debug)]
pub struct Catbox {
    http: HttpClient,
    api_url: String,
}

impl Catbox {
    #[inline]
    pub fn new(http: HttpClient) -> Self {
        Self::with_api_url(http, CATBOX_API_URL)
    }

    /// Create `Catbox` talking to a different API endpoint.
    #[inline]
    pub fn with_api_url<S: Into<String>>(http: HttpClient, api_url: S) -> Self {
        Catbox{http, api_url: api_url.into()}
    }
}

impl ImageHost for Catbox {
    fn upload(&self, png: &[u8]) -> Result<String, UpstreamError> {
        info!("Uploading {} bytes of image to temporary host", png.len());
        let form = Form::new()
            .text("reqtype", "fileupload")
            .part("fileToUpload", Part::bytes(png.to_vec()).file_name(UPLOAD_FILE_NAME));

        let url = self.api_url.as_str();
        let response = self.http.send(url, self.http.post(url).multipart(form))?;
        let body = response.text().map_err(|e| UpstreamError::from_reqwest(url, e))?;

        let hosted_url = parse_hosted_url(url, &body)?;
        info!("Image uploaded to {}", hosted_url);
        Ok(hosted_url)
    }
}

/// Interpret the body of catbox's response, which should be just the file URL.
fn parse_hosted_url(api_url: &str, body: &str) -> Result<String, UpstreamError> {
    let body = body.trim();
    match Url::parse(body) {
        Ok(ref url) if url.scheme() == "http" || url.scheme() == "https" => Ok(body.to_owned()),
        _ => {
            let excerpt: String = body.chars().take(64).collect();
            Err(UpstreamError::malformed(api_url,
                format!("expected URL of the uploaded file, got {:?}", excerpt)))
        }
    }
}


#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use super::parse_hosted_url;
    use crate::remote::UpstreamError;

    const API: &str = "https://catbox.example/api.php";

    #[test]
    fn hosted_url_is_trimmed() {
        let url = parse_hosted_url(API, "https://files.catbox.moe/abc123.png\n").unwrap();
        assert_eq!("https://files.catbox.moe/abc123.png", url);
    }

    #[test]
    fn error_page_is_malformed() {
        let result = parse_hosted_url(API, "<html><body>502 Bad Gateway</body></html>");
        match result {
            Err(UpstreamError::Malformed(ref url, _)) => assert_eq!(API, url),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_body_is_malformed() {
        assert_that!(parse_hosted_url(API, "")).is_err();
        assert_that!(parse_hosted_url(API, "ftp://files.catbox.moe/x.png")).is_err();
    }
}
