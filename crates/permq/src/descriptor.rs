//! Permission request descriptors
//!
//! Identifies which capability is being queried.

use serde::{Deserialize, Serialize};

use crate::name::PermissionName;

/// Permission request descriptor.
///
/// `sysex` is meaningful only for midi and `user_visible_only` only for
/// push; providers ignore them for every other name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDescriptor {
    pub name: PermissionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysex: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_visible_only: Option<bool>,
}

impl PermissionDescriptor {
    pub fn new(name: PermissionName) -> Self {
        Self {
            name,
            sysex: None,
            user_visible_only: None,
        }
    }

    /// Request system-exclusive midi access
    pub fn with_sysex(mut self, sysex: bool) -> Self {
        self.sysex = Some(sysex);
        self
    }

    /// Request user-visible-only push delivery
    pub fn with_user_visible_only(mut self, user_visible_only: bool) -> Self {
        self.user_visible_only = Some(user_visible_only);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder() {
        let desc = PermissionDescriptor::new(PermissionName::Midi).with_sysex(true);
        assert_eq!(desc.name, PermissionName::Midi);
        assert_eq!(desc.sysex, Some(true));
        assert_eq!(desc.user_visible_only, None);
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let desc = PermissionDescriptor::new(PermissionName::Push).with_user_visible_only(true);
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["name"], "push");
        assert_eq!(json["userVisibleOnly"], true);
        assert!(json.get("sysex").is_none());
    }
}
