mod agenda;
mod media;
mod store;

pub use agenda::AgendaError;
pub use agenda_schema::{ApiErrorBody, ApiErrorObject};
pub use media::MediaError;
pub use store::StoreError;
