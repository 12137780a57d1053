//! Image operations used to prepare the background and trim the result.

use std::io::Cursor;

use image::{self, DynamicImage, ImageError, ImageFormat, Rgb, RgbImage};
use image::imageops::{self, FilterType};

use crate::model::constants::MAX_BACKGROUND_PIXELS;


/// Compute the size the image should be scaled to before padding.
///
/// Images wider than tall get their height scaled to `target_size` minus the padding
/// (so that the padded image is `target_size` tall);
/// others get their width scaled to `target_size`.
/// Aspect ratio is preserved either way.
///
/// Returns `None` if the padded image would exceed `MAX_BACKGROUND_PIXELS`,
/// which happens for extreme aspect ratios.
pub fn scaled_dimensions((width, height): (u32, u32),
                         target_size: u32, padding: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return Some((width, height));
    }
    let scale = if width > height {
        f64::from(target_size.saturating_sub(padding.saturating_mul(2))) / f64::from(height)
    } else {
        f64::from(target_size) / f64::from(width)
    };
    let scaled = |d: u32| {
        let d = (f64::from(d) * scale).floor();
        if d > f64::from(u32::MAX) { None } else { Some((d as u32).max(1)) }
    };
    let (width, height) = (scaled(width)?, scaled(height)?);

    let padded_height = height.checked_add(padding.checked_mul(2)?)?;
    let pixels = u64::from(width).checked_mul(u64::from(padded_height))?;
    if pixels > MAX_BACKGROUND_PIXELS {
        return None;
    }
    Some((width, height))
}

/// Scale the image (see `scaled_dimensions`) and pad it with black rows
/// at the top and bottom.
///
/// Returns `None` if the result would be too large.
pub fn scale_and_pad(img: &DynamicImage, target_size: u32, padding: u32) -> Option<DynamicImage> {
    let (width, height) = scaled_dimensions((img.width(), img.height()), target_size, padding)?;
    debug!("Resizing image from {}x{} to {}x{}", img.width(), img.height(), width, height);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    trace!("Resized image to {}x{}", resized.width(), resized.height());

    // Can't overflow, scaled_dimensions has checked that.
    let mut padded = RgbImage::from_pixel(width, height + 2 * padding, Rgb([0, 0, 0]));
    imageops::replace(&mut padded, &resized.to_rgb8(), 0, i64::from(padding));
    debug!("Padded image to {}x{}", padded.width(), padded.height());
    Some(DynamicImage::ImageRgb8(padded))
}

/// Cut `padding` rows off the top and bottom of the image.
///
/// Returns `None` if the image isn't tall enough to have anything left.
pub fn crop_padding(img: &DynamicImage, padding: u32) -> Option<DynamicImage> {
    let height = img.height().checked_sub(2 * padding).filter(|&h| h > 0)?;
    Some(img.crop_imm(0, padding, img.width(), height))
}

/// Encode the image as PNG.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    trace!("Encoded {}x{} image as {} bytes of PNG", img.width(), img.height(), bytes.len());
    Ok(bytes)
}

/// Decode an image of any supported format.
#[inline]
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}
