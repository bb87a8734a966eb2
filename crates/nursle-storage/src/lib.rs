//! nursle-storage
//!
//! Record storage. Thin wrapper around the AWS S3 SDK, with an in-memory
//! backend for local runs and tests.

pub mod client;
pub mod error;
pub mod objects;
pub mod records;
pub mod store;
