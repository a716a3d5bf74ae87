//! Storage abstractions for service layer
//!
//! Both the record and the credential stores persist an ordered JSON array
//! to one file each; they share the primitive in `json_array_store`.

pub mod json_array_store;

pub use json_array_store::{read_array, write_array, JsonArrayStore};
