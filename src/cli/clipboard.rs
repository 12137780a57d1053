//! Module for putting the finished meme on the clipboard.

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use memer::MemeOutput;


/// Copy the meme's pixels to the system clipboard as a bitmap.
pub fn copy(output: &MemeOutput) -> Result<(), arboard::Error> {
    let rgba = output.to_rgba();
    let (width, height) = rgba.dimensions();
    let image = ImageData{
        width: width as usize,
        height: height as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    };

    let mut clipboard = Clipboard::new()?;
    clipboard.set_image(image)?;
    debug!("Copied {}x{} image to the clipboard", width, height);
    Ok(())
}
