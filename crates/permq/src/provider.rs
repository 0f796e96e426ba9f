//! Provider seam
//!
//! The injected host service that owns permission state, and the live
//! status records it hands out.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::descriptor::PermissionDescriptor;
use crate::name::PermissionName;
use crate::outcome::PermissionState;

/// Change notification callback
pub type ChangeListener = Box<dyn Fn(PermissionState) + Send + Sync>;

/// Boxed future returned by provider queries
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<StatusHandle, ProviderError>> + Send + 'a>>;

/// Provider-side failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Capability name not recognized in this environment
    #[error("permission not recognized: {0}")]
    Unrecognized(String),

    /// Request failed shape or type validation
    #[error("malformed permission request: {0}")]
    Type(String),

    /// Any other provider failure
    #[error("provider failure: {0}")]
    Other(String),
}

/// Live provider-owned permission status record
pub trait StatusSource: Send + Sync {
    /// Capability this record tracks
    fn name(&self) -> PermissionName;

    /// Current state
    fn state(&self) -> PermissionState;

    /// Register a change listener; it fires on every state transition
    fn on_change(&self, listener: ChangeListener);
}

/// Opaque handle to a provider's live status record.
///
/// Holding the handle is required to receive change notifications. The
/// record stays owned by the provider and may keep emitting change events
/// for as long as the provider tracks it.
#[derive(Clone)]
pub struct StatusHandle {
    source: Arc<dyn StatusSource>,
}

impl StatusHandle {
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self { source }
    }

    pub fn name(&self) -> PermissionName {
        self.source.name()
    }

    pub fn state(&self) -> PermissionState {
        self.source.state()
    }

    pub fn on_change(&self, listener: ChangeListener) {
        self.source.on_change(listener)
    }
}

impl fmt::Debug for StatusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusHandle")
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Asynchronous permission-state service supplied by the host
pub trait PermissionProvider: Send + Sync {
    /// Resolve the current status record for a capability.
    ///
    /// May suspend until user interaction completes; the first query for
    /// a capability can trigger an interactive prompt.
    fn query_status<'a>(&'a self, descriptor: &PermissionDescriptor) -> ProviderFuture<'a>;

    /// Whether the provider is present in this environment
    fn is_available(&self) -> bool {
        true
    }
}
