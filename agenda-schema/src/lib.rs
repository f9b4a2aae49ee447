pub mod contact;
pub mod error;
pub mod message;

pub use contact::{CONTACT_COLUMNS, Contact};
pub use error::{ApiErrorBody, ApiErrorObject};
pub use message::MessageBody;
