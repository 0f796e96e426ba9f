//! Permission query facade

use std::str::FromStr;
use std::sync::Arc;

use crate::descriptor::PermissionDescriptor;
use crate::handler::{AsyncHandler, HandlerOptions, SyncHandler};
use crate::name::PermissionName;
use crate::outcome::{PermissionError, PermissionOutcome};
use crate::provider::{PermissionProvider, ProviderError};

const PROVIDER_UNAVAILABLE: &str = "permission provider unavailable";

/// Typed facade over an injected permission provider.
///
/// Cheap to clone; clones share the provider.
#[derive(Clone)]
pub struct Permissions {
    provider: Arc<dyn PermissionProvider>,
}

impl Permissions {
    pub fn new(provider: Arc<dyn PermissionProvider>) -> Self {
        Self { provider }
    }

    /// Query the current state of a capability.
    ///
    /// Always resolves to a classified outcome; provider failures are
    /// mapped onto the error outcome, never propagated raw. Every call
    /// re-resolves against the provider, nothing is cached.
    pub async fn query(&self, descriptor: &PermissionDescriptor) -> PermissionOutcome {
        tracing::debug!("permission query: {}", descriptor.name);

        if !self.provider.is_available() {
            return PermissionOutcome::Error(PermissionError::unsupported(PROVIDER_UNAVAILABLE));
        }

        match self.provider.query_status(descriptor).await {
            Ok(status) => PermissionOutcome::from_status(status),
            Err(err) => {
                tracing::debug!("permission query for {} failed: {err}", descriptor.name);
                PermissionOutcome::Error(classify(err))
            }
        }
    }

    /// Query by wire name.
    ///
    /// A name outside the supported set resolves to an unsupported error
    /// outcome without reaching the provider.
    pub async fn query_named(&self, name: &str) -> PermissionOutcome {
        match PermissionName::from_str(name) {
            Ok(name) => self.query(&PermissionDescriptor::new(name)).await,
            Err(err) => PermissionOutcome::Error(PermissionError::unsupported(err.to_string())),
        }
    }

    /// Whether a permission provider is present
    pub fn is_supported(&self) -> bool {
        self.provider.is_available()
    }

    /// Error unless a permission provider is present
    pub fn ensure_supported(&self) -> Result<(), PermissionError> {
        if self.provider.is_available() {
            Ok(())
        } else {
            Err(PermissionError::unsupported(PROVIDER_UNAVAILABLE))
        }
    }

    /// Build a fire-and-forget handler for a capability
    pub fn sync_handler(
        &self,
        descriptor: PermissionDescriptor,
        options: HandlerOptions,
    ) -> SyncHandler {
        SyncHandler::new(self.clone(), descriptor, options)
    }

    /// Build a future-settling handler for a capability
    pub fn async_handler(&self, descriptor: PermissionDescriptor) -> AsyncHandler {
        AsyncHandler::new(self.clone(), descriptor)
    }
}

/// Map a provider failure onto the two recognized error subkinds.
/// Failures not identified as an unrecognized capability classify as
/// invalid.
fn classify(err: ProviderError) -> PermissionError {
    match err {
        ProviderError::Unrecognized(name) => {
            PermissionError::unsupported(format!("permission not recognized: {name}"))
        }
        ProviderError::Type(message) => PermissionError::invalid(message),
        ProviderError::Other(message) => PermissionError::invalid(message),
    }
}
