//! Core domain logic for the document-intake service: admission limiting,
//! DTO/entity translation, transactional persistence, and the create-document
//! coordinator that composes them.

pub mod document;
pub mod error;
pub mod limiter;
pub mod service;
pub mod store;

pub use error::CoreError;
