//! Action outcomes and user-facing notices

use crate::error::Result;
use log::warn;

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short title and description shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// How a successful action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Done; tell the user
    Completed(Notice),
    /// Nothing to report (cancelled share, dismissed save dialog)
    NoOp,
    /// No native share; show the channel list
    ChooseChannel,
}

impl ActionOutcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            ActionOutcome::Completed(notice) => Some(notice),
            ActionOutcome::NoOp | ActionOutcome::ChooseChannel => None,
        }
    }
}

/// The notice to show for an action result, if any.
///
/// Errors are logged with their internal detail; the notice only carries
/// the generic wording from `Error::notice`.
pub fn notice_for(result: &Result<ActionOutcome>) -> Option<Notice> {
    match result {
        Ok(outcome) => outcome.notice().cloned(),
        Err(e) => {
            warn!("Action failed: {}", e);
            Some(e.notice())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_notice_for_success() {
        let result = Ok(ActionOutcome::Completed(Notice::success("Copied", "done")));
        let notice = notice_for(&result).unwrap();
        assert_eq!(notice.title, "Copied");
        assert!(!notice.is_error());
    }

    #[test]
    fn test_no_notice_for_noop() {
        assert!(notice_for(&Ok(ActionOutcome::NoOp)).is_none());
        assert!(notice_for(&Ok(ActionOutcome::ChooseChannel)).is_none());
    }

    #[test]
    fn test_error_notice_hides_detail() {
        let result = Err(Error::DecodeFailed("expected '>' at 1:17".to_string()));
        let notice = notice_for(&result).unwrap();
        assert!(notice.is_error());
        assert!(!notice.description.contains("1:17"));
    }
}
