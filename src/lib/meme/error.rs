//! Meme making error.

use std::error::Error;
use std::fmt;

use image::ImageError;

use crate::remote::UpstreamError;
use crate::resolve::ResolveError;


/// Error that may occur while making a meme.
///
/// The variant names the stage of the pipeline that has failed.
#[derive(Debug)]
pub enum MemeError {
    /// The source link couldn't be resolved to an image.
    Resolve(ResolveError),
    /// The source image couldn't be downloaded.
    Fetch(UpstreamError),
    /// Downloaded image (from the given URL) couldn't be decoded.
    Decode(String, ImageError),
    /// Source image (of given width & height) would be too large once scaled & padded.
    TooLarge(u32, u32),
    /// Image couldn't be encoded as PNG.
    Encode(ImageError),
    /// Padded image couldn't be uploaded to the image host.
    Upload(UpstreamError),
    /// The meme couldn't be rendered (or the render was unusable).
    Render(UpstreamError),
}

impl MemeError {
    /// Short name of the pipeline stage that has failed.
    pub fn stage(&self) -> &'static str {
        match *self {
            MemeError::Resolve(_) => "resolve",
            MemeError::Fetch(_) => "fetch",
            MemeError::Decode(..) => "decode",
            MemeError::TooLarge(..) => "scale",
            MemeError::Encode(_) => "encode",
            MemeError::Upload(_) => "upload",
            MemeError::Render(_) => "render",
        }
    }
}

impl Error for MemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            MemeError::Resolve(ref e) => Some(e),
            MemeError::Fetch(ref e) => Some(e),
            MemeError::Decode(_, ref e) => Some(e),
            MemeError::TooLarge(..) => None,
            MemeError::Encode(ref e) => Some(e),
            MemeError::Upload(ref e) => Some(e),
            MemeError::Render(ref e) => Some(e),
        }
    }
}

impl fmt::Display for MemeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MemeError::Resolve(ref e) => write!(fmt, "cannot resolve the link: {}", e),
            MemeError::Fetch(ref e) => write!(fmt, "cannot download the image: {}", e),
            MemeError::Decode(ref url, ref e) => write!(fmt, "cannot decode image from {}: {}", url, e),
            MemeError::TooLarge(width, height) => write!(fmt,
                "image of {}x{} would be too large after scaling", width, height),
            MemeError::Encode(ref e) => write!(fmt, "failed to encode the image: {}", e),
            MemeError::Upload(ref e) => write!(fmt, "cannot upload the image: {}", e),
            MemeError::Render(ref e) => write!(fmt, "cannot render the meme: {}", e),
        }
    }
}
