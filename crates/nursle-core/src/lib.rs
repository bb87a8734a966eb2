//! nursle-core
//!
//! Pure domain types and storage key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the Nursle system.

pub mod error;
pub mod keys;
pub mod models;
