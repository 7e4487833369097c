//! User actions
//!
//! - `facade.rs` - Download, copy and share entry points
//! - `outcome.rs` - Action outcomes and notices

pub mod facade;
pub mod outcome;

pub use facade::{ActionFacade, Platform, QrContext};
pub use outcome::{notice_for, ActionOutcome, Notice, NoticeKind};
