//! Defines the output of making a meme.

use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};


/// Output of the meme making process.
#[derive(Clone, Debug)]
#[must_use = "unused meme output which must be used"]
pub struct MemeOutput {
    name: String,
    image: DynamicImage,
    bytes: Vec<u8>,
}

impl MemeOutput {
    #[inline]
    pub(super) fn new(name: String, image: DynamicImage, bytes: Vec<u8>) -> Self {
        MemeOutput{name, image, bytes}
    }
}

impl MemeOutput {
    /// Base name of the output file (without extension).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the output file, with extension.
    #[inline]
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Image format of the output. Always PNG.
    #[inline]
    pub fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    /// Width and height of the output, in pixels.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// The decoded image.
    #[inline]
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// The image as RGBA pixels, e.g. for putting it on a clipboard.
    pub fn to_rgba(&self) -> RgbaImage {
        self.image.to_rgba8()
    }

    /// Raw bytes of the output, i.e. the encoded PNG.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    /// Convert the output into a vector of bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl MemeOutput {
    /// Save the output into given directory as `{name}.png`,
    /// creating the directory if needed.
    ///
    /// Returns the path of the written file.
    pub fn save_to<P: AsRef<Path>>(&self, directory: P) -> io::Result<PathBuf> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;
        let path = directory.join(self.file_name());
        fs::write(&path, &self.bytes)?;
        debug!("Saved {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

impl Deref for MemeOutput {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes()
    }
}

impl Into<Vec<u8>> for MemeOutput {
    fn into(self) -> Vec<u8> {
        self.into_bytes()
    }
}


#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::process;

    use image::{DynamicImage, RgbImage};
    use spectral::prelude::*;
    use super::MemeOutput;

    fn output(name: &str) -> MemeOutput {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        MemeOutput::new(name.to_owned(), image, vec![1, 2, 3])
    }

    #[test]
    fn file_name_is_png() {
        assert_eq!("doge.png", output("doge").file_name());
        assert_eq!((4, 2), output("doge").dimensions());
    }

    #[test]
    fn save_creates_directory() {
        let dir = env::temp_dir()
            .join(format!("memer-output-test-{}", process::id()))
            .join("nested");
        let path = output("doge").save_to(&dir).unwrap();

        assert_eq!(dir.join("doge.png"), path);
        assert_that!(fs::read(&path).unwrap()).is_equal_to(vec![1, 2, 3]);
        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }
}
