use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where contacts and images live on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// CSV file holding the contacts; created with a header row when missing.
    /// TOML: `storage.contacts_path`. Default: `contacts.csv`.
    #[serde(default = "default_contacts_path")]
    pub contacts_path: PathBuf,

    /// Directory receiving uploaded images and generated QR codes.
    /// TOML: `storage.images_dir`. Default: `images`.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Largest accepted request body on `/images`, in bytes.
    /// TOML: `storage.max_upload_bytes`. Default: 10 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            contacts_path: default_contacts_path(),
            images_dir: default_images_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_contacts_path() -> PathBuf {
    PathBuf::from("contacts.csv")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
