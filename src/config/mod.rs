//! Configuration module for QRito Share
//!
//! This module handles user preferences and deployment parameters,
//! including serialization/deserialization to/from JSON and
//! persistent storage to platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
