use crate::{Error, Submitted};

/// How long a notice stays on screen.
pub const NOTICE_TIMEOUT_MS: i32 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class the web frontend tags the message element with.
    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

/// A transient message shown in response to a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl From<Submitted> for Notice {
    fn from(submitted: Submitted) -> Self {
        match submitted {
            Submitted::Created(_) => Notice::success("Tweet added successfully"),
            Submitted::Updated(_) => Notice::success("Tweet updated successfully"),
        }
    }
}

impl From<&Error> for Notice {
    fn from(error: &Error) -> Self {
        match error {
            Error::Validation(_) => Notice::error("A tweet cannot be empty"),
            other => Notice::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_notices() {
        assert_eq!(
            Notice::from(Submitted::Created(1)),
            Notice::success("Tweet added successfully")
        );
        assert_eq!(
            Notice::from(Submitted::Updated(1)),
            Notice::success("Tweet updated successfully")
        );
    }

    #[test]
    fn test_error_notices() {
        let notice = Notice::from(&Error::Validation("tweet cannot be empty".into()));
        assert!(notice.is_error());
        assert_eq!(notice.message, "A tweet cannot be empty");

        let notice = Notice::from(&Error::Storage("quota exceeded".into()));
        assert_eq!(notice.kind.class(), "error");
        assert_eq!(notice.message, "storage error: quota exceeded");
    }
}
