//! Sharing
//!
//! - `channels.rs` - Share targets and their deep links
//! - `native.rs` - The native share surface and the share payload
//! - `orchestrator.rs` - The share state machine and its driver

pub mod channels;
pub mod native;
pub mod orchestrator;

pub use channels::{encode_component, ShareTarget};
pub use native::{
    NativeShare, NativeShareOutcome, NativeShareRequest, NoNativeShare, ShareCapability,
    SharePayload,
};
pub use orchestrator::{
    transition, ChannelOutcome, ShareEvent, ShareFlow, ShareOrchestrator, ShareResolution,
    ShareState,
};
