//! In-memory permission provider
//!
//! Host-managed permission decisions with change notification fan-out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::descriptor::PermissionDescriptor;
use crate::name::PermissionName;
use crate::outcome::PermissionState;
use crate::provider::{
    ChangeListener, PermissionProvider, ProviderError, ProviderFuture, StatusHandle, StatusSource,
};

/// Provider backed by an in-memory state table.
///
/// States default to prompt. Mutations update every status record issued
/// for the affected capability and fire its change listeners. Records are
/// kept alive for the lifetime of the provider, matching a host that
/// tracks issued statuses indefinitely.
#[derive(Clone, Default)]
pub struct MemoryProvider {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    unavailable: bool,
    /// `None` recognizes every capability name
    supported: Option<Vec<PermissionName>>,
    states: Mutex<HashMap<PermissionName, PermissionState>>,
    handles: Mutex<Vec<Arc<MemoryStatus>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that only recognizes the given capability names
    pub fn with_supported(names: impl IntoIterator<Item = PermissionName>) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                supported: Some(names.into_iter().collect()),
                ..MemoryInner::default()
            }),
        }
    }

    /// Provider that reports itself absent
    pub fn unavailable() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                unavailable: true,
                ..MemoryInner::default()
            }),
        }
    }

    pub fn grant(&self, name: PermissionName) {
        self.set_state(name, PermissionState::Granted);
    }

    pub fn deny(&self, name: PermissionName) {
        self.set_state(name, PermissionState::Denied);
    }

    /// Reset a capability back to prompt
    pub fn revoke(&self, name: PermissionName) {
        self.set_state(name, PermissionState::Prompt);
    }

    /// Current recorded state, prompt when never set
    pub fn state(&self, name: PermissionName) -> PermissionState {
        self.inner
            .states
            .lock()
            .unwrap()
            .get(&name)
            .copied()
            .unwrap_or(PermissionState::Prompt)
    }

    /// Record a state and notify every live record for the capability.
    pub fn set_state(&self, name: PermissionName, state: PermissionState) {
        self.inner.states.lock().unwrap().insert(name, state);

        let records: Vec<Arc<MemoryStatus>> = self
            .inner
            .handles
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.name == name)
            .cloned()
            .collect();
        for record in records {
            record.transition(state);
        }
    }

    fn recognizes(&self, name: PermissionName) -> bool {
        match &self.inner.supported {
            Some(names) => names.contains(&name),
            None => true,
        }
    }
}

/// Live status record issued by [`MemoryProvider`]
struct MemoryStatus {
    name: PermissionName,
    state: Mutex<PermissionState>,
    listeners: Mutex<Vec<ChangeListener>>,
}

impl MemoryStatus {
    /// Update the state and fire listeners; no-op when unchanged.
    fn transition(&self, state: PermissionState) {
        {
            let mut current = self.state.lock().unwrap();
            if *current == state {
                return;
            }
            *current = state;
        }

        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            listener(state);
        }
    }
}

impl StatusSource for MemoryStatus {
    fn name(&self) -> PermissionName {
        self.name
    }

    fn state(&self) -> PermissionState {
        *self.state.lock().unwrap()
    }

    fn on_change(&self, listener: ChangeListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}

impl PermissionProvider for MemoryProvider {
    fn query_status<'a>(&'a self, descriptor: &PermissionDescriptor) -> ProviderFuture<'a> {
        let descriptor = descriptor.clone();
        Box::pin(async move {
            if self.inner.unavailable {
                return Err(ProviderError::Other("provider unavailable".to_string()));
            }
            if !self.recognizes(descriptor.name) {
                return Err(ProviderError::Unrecognized(
                    descriptor.name.as_str().to_string(),
                ));
            }

            let record = Arc::new(MemoryStatus {
                name: descriptor.name,
                state: Mutex::new(self.state(descriptor.name)),
                listeners: Mutex::new(Vec::new()),
            });
            self.inner.handles.lock().unwrap().push(Arc::clone(&record));
            Ok(StatusHandle::new(record))
        })
    }

    fn is_available(&self) -> bool {
        !self.inner.unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(provider: &MemoryProvider, name: PermissionName) -> StatusHandle {
        smol::block_on(provider.query_status(&PermissionDescriptor::new(name))).unwrap()
    }

    #[test]
    fn test_states_default_to_prompt() {
        let provider = MemoryProvider::new();
        assert_eq!(provider.state(PermissionName::Camera), PermissionState::Prompt);

        let status = query(&provider, PermissionName::Camera);
        assert_eq!(status.state(), PermissionState::Prompt);
    }

    #[test]
    fn test_grant_deny_revoke() {
        let provider = MemoryProvider::new();
        provider.grant(PermissionName::Geolocation);
        assert_eq!(
            provider.state(PermissionName::Geolocation),
            PermissionState::Granted
        );

        provider.deny(PermissionName::Geolocation);
        assert_eq!(
            provider.state(PermissionName::Geolocation),
            PermissionState::Denied
        );

        provider.revoke(PermissionName::Geolocation);
        assert_eq!(
            provider.state(PermissionName::Geolocation),
            PermissionState::Prompt
        );
    }

    #[test]
    fn test_set_state_notifies_live_records() {
        let provider = MemoryProvider::new();
        let status = query(&provider, PermissionName::Notifications);

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            status.on_change(Box::new(move |state| {
                seen.lock().unwrap().push(state);
            }));
        }

        provider.deny(PermissionName::Notifications);
        provider.grant(PermissionName::Notifications);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PermissionState::Denied, PermissionState::Granted]
        );
        assert_eq!(status.state(), PermissionState::Granted);
    }

    #[test]
    fn test_unchanged_state_does_not_notify() {
        let provider = MemoryProvider::new();
        provider.deny(PermissionName::Midi);
        let status = query(&provider, PermissionName::Midi);

        let fired = Arc::new(Mutex::new(0usize));
        {
            let fired = Arc::clone(&fired);
            status.on_change(Box::new(move |_| {
                *fired.lock().unwrap() += 1;
            }));
        }

        provider.deny(PermissionName::Midi);
        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[test]
    fn test_unrecognized_name_errors() {
        let provider = MemoryProvider::with_supported([PermissionName::Camera]);
        let result =
            smol::block_on(provider.query_status(&PermissionDescriptor::new(PermissionName::Midi)));
        assert!(matches!(result, Err(ProviderError::Unrecognized(_))));
    }

    #[test]
    fn test_unavailable_provider() {
        let provider = MemoryProvider::unavailable();
        assert!(!provider.is_available());
    }
}
