use std::io;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum MediaError {
    #[error("QR data must not be empty")]
    EmptyQrData,

    #[error("QR encoding failed: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("invalid crop box: {0}")]
    InvalidCrop(String),

    #[error("crop box {left},{upper},{right},{lower} exceeds image bounds {width}x{height}")]
    CropOutOfBounds {
        left: u32,
        upper: u32,
        right: u32,
        lower: u32,
        width: u32,
        height: u32,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl MediaError {
    /// Whether the failure was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        match self {
            MediaError::Io(_) => false,
            MediaError::Image(image::ImageError::IoError(_)) => false,
            _ => true,
        }
    }
}
