pub mod config;
pub mod error;
pub mod media;
pub mod server;
pub mod store;
pub mod utils;

pub use agenda_schema::Contact;
pub use error::{AgendaError, MediaError, StoreError};
