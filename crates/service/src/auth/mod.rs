//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Credentials live in their own JSON array file. Sessions are stateless
//! HS256 tokens; see [`token`] for the clock-explicit primitives.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;
pub mod token;

pub use service::AuthService;
