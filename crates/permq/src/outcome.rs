//! Permission states and normalized query outcomes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::provider::StatusHandle;

/// Permission state reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

impl PermissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Prompt => "prompt",
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error subkind of a failed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionErrorKind {
    /// Capability unrecognized by the provider, or provider absent
    Unsupported,
    /// Request rejected at the provider boundary
    Invalid,
}

impl PermissionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for PermissionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified permission failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} permission error: {message}")]
pub struct PermissionError {
    pub kind: PermissionErrorKind,
    pub message: String,
}

impl PermissionError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            kind: PermissionErrorKind::Unsupported,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: PermissionErrorKind::Invalid,
            message: message.into(),
        }
    }
}

/// Flattened state tag of an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeState {
    Granted,
    Prompt,
    Denied,
    Unsupported,
    Invalid,
}

impl OutcomeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Prompt => "prompt",
            Self::Denied => "denied",
            Self::Unsupported => "unsupported",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for OutcomeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized result of a permission query.
///
/// Exactly one of the three shapes is produced per query. `Granted` and
/// `Denied` carry the provider's live status handle; holding it is what
/// keeps change notifications flowing.
#[derive(Debug, Clone)]
pub enum PermissionOutcome {
    /// Access is allowed now, or the provider will prompt on first use
    Granted {
        /// `Granted` or `Prompt`, never `Denied`
        state: PermissionState,
        status: StatusHandle,
        message: String,
    },
    /// Access is currently refused
    Denied { status: StatusHandle, message: String },
    /// The query could not be resolved to a state
    Error(PermissionError),
}

impl PermissionOutcome {
    /// Wrap a live status record per its current state.
    pub(crate) fn from_status(status: StatusHandle) -> Self {
        let state = status.state();
        Self::with_state(status, state)
    }

    /// Wrap a live status record with an explicit state, used when a
    /// change notification already carries the new state.
    pub(crate) fn with_state(status: StatusHandle, state: PermissionState) -> Self {
        let name = status.name();
        match state {
            PermissionState::Granted => Self::Granted {
                state,
                status,
                message: format!("{name} permission granted"),
            },
            PermissionState::Prompt => Self::Granted {
                state,
                status,
                message: format!("{name} permission will prompt on first use"),
            },
            PermissionState::Denied => Self::Denied {
                status,
                message: format!("{name} permission denied"),
            },
        }
    }

    /// The flattened state tag; always present and disambiguates the shape
    pub fn state(&self) -> OutcomeState {
        match self {
            Self::Granted {
                state: PermissionState::Prompt,
                ..
            } => OutcomeState::Prompt,
            Self::Granted { .. } => OutcomeState::Granted,
            Self::Denied { .. } => OutcomeState::Denied,
            Self::Error(err) => match err.kind {
                PermissionErrorKind::Unsupported => OutcomeState::Unsupported,
                PermissionErrorKind::Invalid => OutcomeState::Invalid,
            },
        }
    }

    /// Live status handle, when the outcome carries one
    pub fn status(&self) -> Option<&StatusHandle> {
        match self {
            Self::Granted { status, .. } | Self::Denied { status, .. } => Some(status),
            Self::Error(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Granted { message, .. } | Self::Denied { message, .. } => message,
            Self::Error(err) => &err.message,
        }
    }

    pub fn error(&self) -> Option<&PermissionError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::PermissionName;
    use crate::provider::{ChangeListener, StatusSource};
    use std::sync::Arc;

    struct StubStatus {
        name: PermissionName,
        state: PermissionState,
    }

    impl StatusSource for StubStatus {
        fn name(&self) -> PermissionName {
            self.name
        }

        fn state(&self) -> PermissionState {
            self.state
        }

        fn on_change(&self, _listener: ChangeListener) {}
    }

    fn handle(state: PermissionState) -> StatusHandle {
        StatusHandle::new(Arc::new(StubStatus {
            name: PermissionName::Camera,
            state,
        }))
    }

    #[test]
    fn test_granted_state_wraps_as_granted() {
        let outcome = PermissionOutcome::from_status(handle(PermissionState::Granted));
        assert!(outcome.is_granted());
        assert_eq!(outcome.state(), OutcomeState::Granted);
        assert_eq!(outcome.message(), "camera permission granted");
    }

    #[test]
    fn test_prompt_state_wraps_as_granted() {
        let outcome = PermissionOutcome::from_status(handle(PermissionState::Prompt));
        assert!(outcome.is_granted());
        assert_eq!(outcome.state(), OutcomeState::Prompt);
    }

    #[test]
    fn test_denied_state_wraps_as_denied() {
        let outcome = PermissionOutcome::from_status(handle(PermissionState::Denied));
        assert!(outcome.is_denied());
        assert_eq!(outcome.state(), OutcomeState::Denied);
        assert!(outcome.status().is_some());
    }

    #[test]
    fn test_error_outcome_has_no_status() {
        let outcome = PermissionOutcome::Error(PermissionError::invalid("bad request"));
        assert_eq!(outcome.state(), OutcomeState::Invalid);
        assert!(outcome.status().is_none());
        assert_eq!(outcome.message(), "bad request");
    }
}
