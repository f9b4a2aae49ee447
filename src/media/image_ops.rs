use crate::error::MediaError;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// A crop box `left,upper,right,lower` in pixels; right and lower edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl FromStr for CropBox {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<u32>()
                    .map_err(|e| MediaError::InvalidCrop(format!("{p:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let &[left, upper, right, lower] = parts.as_slice() else {
            return Err(MediaError::InvalidCrop(format!(
                "expected 4 comma-separated values, got {}",
                parts.len()
            )));
        };
        if left >= right || upper >= lower {
            return Err(MediaError::InvalidCrop(format!(
                "empty box {left},{upper},{right},{lower}"
            )));
        }

        Ok(Self {
            left,
            upper,
            right,
            lower,
        })
    }
}

/// Transformations applied to an upload, in field order.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    pub crop: Option<CropBox>,
    pub flip_horizontal: bool,
    pub colorize: bool,
}

impl Transform {
    pub fn apply(&self, mut image: DynamicImage) -> Result<DynamicImage, MediaError> {
        if let Some(b) = self.crop {
            let (width, height) = (image.width(), image.height());
            if b.right > width || b.lower > height {
                return Err(MediaError::CropOutOfBounds {
                    left: b.left,
                    upper: b.upper,
                    right: b.right,
                    lower: b.lower,
                    width,
                    height,
                });
            }
            image = image.crop_imm(b.left, b.upper, b.right - b.left, b.lower - b.upper);
        }
        if self.flip_horizontal {
            image = image.fliph();
        }
        if self.colorize {
            image = DynamicImage::ImageRgb8(colorize(&image));
        }
        Ok(image)
    }
}

/// Grayscale the image, then map black to blue (`#0000ff`) and white to red (`#ff0000`).
pub fn colorize(image: &DynamicImage) -> RgbImage {
    let gray = image.to_luma8();
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let l = gray.get_pixel(x, y).0[0];
        Rgb([l, 0, 255 - l])
    })
}

/// Decode an upload, apply `transform` and save the result into `images_dir`.
///
/// Nothing is written unless the bytes decode and the transform succeeds. Only the last
/// component of `file_name` is used. The output format follows the file extension. Returns
/// the path written.
pub fn process_upload(
    images_dir: &Path,
    file_name: Option<&str>,
    bytes: &[u8],
    transform: &Transform,
) -> Result<PathBuf, MediaError> {
    let image = image::load_from_memory(bytes)?;
    let processed = transform.apply(image)?;

    let path = images_dir.join(safe_file_name(file_name));
    // JPEG has no alpha channel.
    let processed = match ImageFormat::from_path(&path) {
        Ok(ImageFormat::Jpeg) if processed.color().has_alpha() => {
            DynamicImage::ImageRgb8(processed.to_rgb8())
        }
        _ => processed,
    };
    fs::create_dir_all(images_dir)?;
    processed.save(&path)?;

    debug!(
        path = %path.display(),
        width = processed.width(),
        height = processed.height(),
        "Processed upload"
    );
    Ok(path)
}

fn safe_file_name(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with('.'))
        .map_or_else(
            || format!("upload-{}.png", uuid::Uuid::new_v4()),
            str::to_string,
        )
}
