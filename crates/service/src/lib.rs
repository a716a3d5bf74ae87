//! Service layer for the form backend.
//! - `storage`: append-only JSON array files with single-writer write-back.
//! - `records`: form submissions (validation, timestamps, listing).
//! - `auth`: credential registry, password hashing and session tokens.
//!
//! Nothing here depends on the web framework; the `server` crate maps these
//! errors onto HTTP responses.

pub mod errors;
pub mod auth;
pub mod records;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
