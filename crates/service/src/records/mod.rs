//! Records module: form submissions (domain, repository, service).
//!
//! Records are append-only: once a submission is persisted it is never
//! edited, reordered or deleted.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;
pub mod timestamp;

pub use service::FormService;
