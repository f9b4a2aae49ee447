//! Image utilities behind the `/qr` and `/images` routes.

pub mod image_ops;
pub mod qr;

pub use image_ops::{CropBox, Transform, process_upload};
pub use qr::{QR_FILE_NAME, render_png};

use crate::error::MediaError;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Encode any image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, MediaError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
