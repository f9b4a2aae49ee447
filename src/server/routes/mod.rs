pub mod contacts;
pub mod images;
pub mod qr;
