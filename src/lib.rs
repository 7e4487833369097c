//! QRito Share
//!
//! Export, copy and share a rendered QR code. The UI supplies a vector
//! source, the encoded payload, a link and the user's subscription tier; the
//! `ActionFacade` turns button presses into downloads, clipboard writes and
//! share-channel opens, gating premium formats by tier.

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod export;
pub mod launcher;
pub mod promo;
pub mod share;
pub mod string_utils;

#[cfg(test)]
mod testing;

pub use actions::{ActionFacade, ActionOutcome, Notice, Platform, QrContext};
pub use entitlement::{EntitlementTable, SubscriptionTier};
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportRequest, VectorSource};
