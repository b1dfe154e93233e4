//! Product image decoding
//!
//! The vendor serves product images as JPEG at a requested resize target.
//! Unlike price and specification lookups, a bad image payload is an error
//! the caller gets to see.

use crate::DecodeError;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// A decoded product image with its pixel dimensions
#[derive(Debug, Clone)]
pub struct ImageBlob {
    image: DynamicImage,
    width: u32,
    height: u32,
}

impl ImageBlob {
    pub fn new(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Re-encodes the image as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, DecodeError> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Decodes a JPEG byte stream
pub fn decode_jpeg(bytes: &[u8]) -> Result<ImageBlob, DecodeError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?;
    Ok(ImageBlob::new(image))
}
