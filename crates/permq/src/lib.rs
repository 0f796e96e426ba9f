//! permq Permission Facade
//!
//! Typed facade over a host-supplied permission provider.
//!
//! Features:
//! - Closed capability-name set with wire-name parsing
//! - Async query facade that normalizes every provider response into a
//!   granted, denied, or error outcome
//! - Fire-and-forget and future-settling handlers with per-handler
//!   callback slots and change subscription
//! - In-memory provider for hosts that manage decisions themselves

mod descriptor;
mod facade;
mod handler;
mod mem;
mod name;
mod outcome;
mod provider;

pub use descriptor::PermissionDescriptor;
pub use facade::Permissions;
pub use handler::{AsyncHandler, HandlerOptions, PermissionCallback, Settlement, SyncHandler};
pub use mem::MemoryProvider;
pub use name::{PermissionName, UnknownPermissionName};
pub use outcome::{
    OutcomeState, PermissionError, PermissionErrorKind, PermissionOutcome, PermissionState,
};
pub use provider::{
    ChangeListener, PermissionProvider, ProviderError, ProviderFuture, StatusHandle, StatusSource,
};
