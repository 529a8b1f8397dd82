use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::Bitmap,
    foundation::error::{PosterError, PosterResult},
};

/// Decode an encoded raster (PNG, JPEG) into a straight-alpha RGBA8 bitmap.
pub fn decode_image(bytes: &[u8]) -> PosterResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PosterError::input(format!("not a decodable image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(PosterError::input("image has no pixels"));
    }
    Ok(Bitmap::from_rgba_image(rgba))
}

/// Read and decode an image file.
pub fn read_image_file(path: &Path) -> PosterResult<Bitmap> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
