//! Pure utility functions.
//!
//! Process bootstrap and connection retry helpers shared by the binaries.

pub mod bootstrap;
pub mod retry;
