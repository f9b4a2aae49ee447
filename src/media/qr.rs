use super::encode_png;
use crate::error::MediaError;
use image::{DynamicImage, Luma};
use qrcode::{EcLevel, QrCode};

/// Pixels per QR module.
pub const QR_MODULE_PX: u32 = 10;

/// Name under which the latest generated code is kept in the images directory.
pub const QR_FILE_NAME: &str = "qr_code.png";

/// Render `data` as a black-on-white grayscale PNG.
///
/// Uses error-correction level L and the smallest version that fits, with the standard
/// four-module quiet zone.
pub fn render_png(data: &str) -> Result<Vec<u8>, MediaError> {
    if data.is_empty() {
        return Err(MediaError::EmptyQrData);
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)?;
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(QR_MODULE_PX, QR_MODULE_PX)
        .quiet_zone(true)
        .build();

    encode_png(&DynamicImage::ImageLuma8(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_png_with_quiet_zone() {
        let png = render_png("https://example.com/cat.png").unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));

        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.width(), decoded.height());
        assert_eq!(decoded.width() % QR_MODULE_PX, 0);
        // Side is 21 + 4 * (version - 1) modules plus a quiet zone of four on each side.
        let modules = decoded.width() / QR_MODULE_PX - 8;
        assert!(modules >= 25 && (modules - 21) % 4 == 0, "modules = {modules}");
        assert_eq!(decoded.get_pixel(0, 0).0, [255]);
        // The finder pattern starts right after the quiet zone.
        assert_eq!(decoded.get_pixel(4 * QR_MODULE_PX, 4 * QR_MODULE_PX).0, [0]);
    }

    #[test]
    fn rejects_empty_and_oversized_data() {
        assert!(matches!(render_png(""), Err(MediaError::EmptyQrData)));
        let huge = "x".repeat(8000);
        assert!(matches!(render_png(&huge), Err(MediaError::QrEncode(_))));
    }
}
