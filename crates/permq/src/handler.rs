//! Callback and future handlers
//!
//! Invocable wrappers around a single permission query plus a fixed set
//! of named callback slots.

use std::sync::{Arc, Mutex};

use crate::descriptor::PermissionDescriptor;
use crate::facade::Permissions;
use crate::outcome::{PermissionError, PermissionOutcome, PermissionState};

/// Callback invoked with a normalized outcome
pub type PermissionCallback = Arc<dyn Fn(&PermissionOutcome) + Send + Sync>;

/// Per-handler callback slots.
///
/// One callback per slot; registering again overwrites the previous
/// callback. The slots live inside the owning handler, so two handlers
/// can never observe each other's registrations.
#[derive(Default)]
struct HandlerRegistration {
    on_change: Option<PermissionCallback>,
    on_granted: Option<PermissionCallback>,
    on_denied: Option<PermissionCallback>,
    on_error: Option<PermissionCallback>,
}

type SharedRegistration = Arc<Mutex<HandlerRegistration>>;

/// Outcome callbacks supplied to the sync handler constructor
#[derive(Default, Clone)]
pub struct HandlerOptions {
    granted: Option<PermissionCallback>,
    denied: Option<PermissionCallback>,
    error: Option<PermissionCallback>,
}

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(mut self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) -> Self {
        self.granted = Some(Arc::new(cb));
        self
    }

    pub fn denied(mut self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) -> Self {
        self.denied = Some(Arc::new(cb));
        self
    }

    pub fn error(mut self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(cb));
        self
    }
}

/// Fire-and-forget permission handler.
///
/// Invoking the handler re-queries the provider; results surface only
/// through the registered callbacks and the constructor options. A
/// failure with no error callback registered is dropped.
pub struct SyncHandler {
    permissions: Permissions,
    descriptor: PermissionDescriptor,
    options: HandlerOptions,
    registration: SharedRegistration,
}

impl SyncHandler {
    pub(crate) fn new(
        permissions: Permissions,
        descriptor: PermissionDescriptor,
        options: HandlerOptions,
    ) -> Self {
        Self {
            permissions,
            descriptor,
            options,
            registration: SharedRegistration::default(),
        }
    }

    /// Register the change callback, overwriting the slot
    pub fn on_permission_change(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_change = Some(Arc::new(cb));
    }

    /// Register the granted callback, overwriting the slot
    pub fn on_permission_granted(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_granted = Some(Arc::new(cb));
    }

    /// Register the denied callback, overwriting the slot
    pub fn on_permission_denied(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_denied = Some(Arc::new(cb));
    }

    /// Register the error callback, overwriting the slot
    pub fn on_permission_error(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_error = Some(Arc::new(cb));
    }

    /// Query once and route the outcome to the callbacks.
    ///
    /// Returns nothing; never fails. Each invocation runs its own query
    /// and attaches its own change listener.
    pub async fn invoke(&self) {
        let outcome = self.permissions.query(&self.descriptor).await;
        dispatch(&outcome, &self.registration, &self.options);
        attach_change_listener(&outcome, &self.registration);
    }
}

/// Result of a settled [`AsyncHandler`] invocation.
///
/// Exactly one of the two fields is set.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub granted: Option<PermissionOutcome>,
    pub denied: Option<PermissionOutcome>,
}

/// Future-settling permission handler.
///
/// Same callback routing and change subscription as [`SyncHandler`], and
/// the invocation additionally settles with the outcome.
pub struct AsyncHandler {
    permissions: Permissions,
    descriptor: PermissionDescriptor,
    registration: SharedRegistration,
}

impl AsyncHandler {
    pub(crate) fn new(permissions: Permissions, descriptor: PermissionDescriptor) -> Self {
        Self {
            permissions,
            descriptor,
            registration: SharedRegistration::default(),
        }
    }

    /// Register the change callback, overwriting the slot
    pub fn on_permission_change(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_change = Some(Arc::new(cb));
    }

    /// Register the granted callback, overwriting the slot
    pub fn on_permission_granted(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_granted = Some(Arc::new(cb));
    }

    /// Register the denied callback, overwriting the slot
    pub fn on_permission_denied(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_denied = Some(Arc::new(cb));
    }

    /// Register the error callback, overwriting the slot
    pub fn on_permission_error(&self, cb: impl Fn(&PermissionOutcome) + Send + Sync + 'static) {
        self.registration.lock().unwrap().on_error = Some(Arc::new(cb));
    }

    /// Query once, route the outcome to the callbacks, and settle.
    ///
    /// Resolves with a [`Settlement`] on a granted or denied outcome and
    /// rejects with the classified error otherwise.
    pub async fn invoke(&self) -> Result<Settlement, PermissionError> {
        let outcome = self.permissions.query(&self.descriptor).await;
        dispatch(&outcome, &self.registration, &HandlerOptions::default());
        attach_change_listener(&outcome, &self.registration);

        match outcome {
            PermissionOutcome::Error(err) => Err(err),
            outcome @ PermissionOutcome::Granted { .. } => Ok(Settlement {
                granted: Some(outcome),
                denied: None,
            }),
            outcome @ PermissionOutcome::Denied { .. } => Ok(Settlement {
                granted: None,
                denied: Some(outcome),
            }),
        }
    }
}

/// Route an outcome to the matching handler slot, then the matching
/// constructor option.
fn dispatch(
    outcome: &PermissionOutcome,
    registration: &SharedRegistration,
    options: &HandlerOptions,
) {
    let (slot, option) = {
        let reg = registration.lock().unwrap();
        match outcome {
            PermissionOutcome::Granted { .. } => (reg.on_granted.clone(), options.granted.clone()),
            PermissionOutcome::Denied { .. } => (reg.on_denied.clone(), options.denied.clone()),
            PermissionOutcome::Error(_) => (reg.on_error.clone(), options.error.clone()),
        }
    };

    if let Some(cb) = slot {
        cb(outcome);
    }
    if let Some(cb) = option {
        cb(outcome);
    }
}

/// Subscribe the handler's change callback to the outcome's live status.
///
/// Every invocation attaches its own listener; listeners from earlier
/// invocations stay registered on their handles, so repeated invocations
/// notify once per attached listener.
fn attach_change_listener(outcome: &PermissionOutcome, registration: &SharedRegistration) {
    let Some(status) = outcome.status() else {
        return;
    };
    if registration.lock().unwrap().on_change.is_none() {
        return;
    }

    let registration = Arc::clone(registration);
    let handle = status.clone();
    status.on_change(Box::new(move |state| {
        tracing::debug!("permission change: {} -> {state}", handle.name());
        let fresh = PermissionOutcome::with_state(handle.clone(), state);

        let (on_change, on_denied) = {
            let reg = registration.lock().unwrap();
            (reg.on_change.clone(), reg.on_denied.clone())
        };

        if let Some(cb) = on_change {
            cb(&fresh);
        }
        if state == PermissionState::Denied {
            if let Some(cb) = on_denied {
                cb(&fresh);
            }
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::MemoryProvider;
    use crate::name::PermissionName;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn facade(provider: &MemoryProvider) -> Permissions {
        Permissions::new(Arc::new(provider.clone()))
    }

    #[test]
    fn test_registration_overwrites_slot() {
        let provider = MemoryProvider::new();
        provider.grant(PermissionName::Camera);
        let handler = facade(&provider).sync_handler(
            PermissionDescriptor::new(PermissionName::Camera),
            HandlerOptions::new(),
        );

        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        {
            let first = Arc::clone(&first);
            handler.on_permission_granted(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let second = Arc::clone(&second);
            handler.on_permission_granted(move |_| {
                second.fetch_add(1, Ordering::SeqCst);
            });
        }

        smol::block_on(handler.invoke());
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sync_invoke_is_repeatable() {
        let provider = MemoryProvider::new();
        provider.deny(PermissionName::Microphone);
        let denied = Arc::new(AtomicUsize::new(0));
        let options = {
            let denied = Arc::clone(&denied);
            HandlerOptions::new().denied(move |_| {
                denied.fetch_add(1, Ordering::SeqCst);
            })
        };
        let handler = facade(&provider)
            .sync_handler(PermissionDescriptor::new(PermissionName::Microphone), options);

        smol::block_on(async {
            handler.invoke().await;
            handler.invoke().await;
            handler.invoke().await;
        });
        assert_eq!(denied.load(Ordering::SeqCst), 3);
    }
}
