//! Utility module.

pub mod imageops;
