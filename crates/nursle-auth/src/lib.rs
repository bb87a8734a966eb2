//! nursle-auth
//!
//! Nurse credentials and session tokens.

pub mod error;
pub mod password;
pub mod session;
