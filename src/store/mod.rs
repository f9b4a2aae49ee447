//! Contact storage: the CSV-backed table and the actor that serializes access to it.
//!
//! Layout:
//! - `contacts_csv.rs`: synchronous file operations over the CSV table
//! - `actor.rs`: single owner of the table; every request is one message

pub mod actor;
pub mod contacts_csv;

pub use actor::{ContactStoreHandle, spawn};
pub use contacts_csv::ContactStore;
