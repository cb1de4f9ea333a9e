use crate::{credential_gate::Identity, error::OperatorError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the operator, shown once then cleared
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Operator session state
///
/// The matched identity is kept for the session but is never part of a
/// notice, so a successful login does not reveal which record matched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    pub is_authenticated: bool,
    operator: Option<Identity>,

    pub notice: Option<Notice>,

    /// Dispatched commands whose outcome has not been delivered yet
    pub pending_dispatches: u32,
}

impl Model {
    pub fn start_session(&mut self, identity: Identity) {
        self.is_authenticated = true;
        self.operator = Some(identity);
    }

    /// Invalidate the current session (logout)
    pub fn invalidate_session(&mut self) {
        self.is_authenticated = false;
        self.operator = None;
    }

    pub fn operator(&self) -> Option<&Identity> {
        self.operator.as_ref()
    }

    pub fn set_success(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Success,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, error: OperatorError) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: error.to_string(),
        });
    }

    /// Hand the pending notice to the presentation layer
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
