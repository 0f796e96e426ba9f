//! Capability names
//!
//! The closed set of permission names a provider can be asked about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Capability identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionName {
    Geolocation,
    Notifications,
    Push,
    Midi,
    Camera,
    Microphone,
    SpeakerSelection,
    DeviceInfo,
    BackgroundFetch,
    BackgroundSync,
    Bluetooth,
    PersistentStorage,
    AmbientLightSensor,
    Accelerometer,
    Gyroscope,
    Magnetometer,
    ClipboardRead,
    ClipboardWrite,
    ScreenWakeLock,
    DisplayCapture,
}

/// Parse failure for a capability name outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission name: {0}")]
pub struct UnknownPermissionName(pub String);

impl PermissionName {
    /// Every supported capability name
    pub const ALL: [PermissionName; 20] = [
        Self::Geolocation,
        Self::Notifications,
        Self::Push,
        Self::Midi,
        Self::Camera,
        Self::Microphone,
        Self::SpeakerSelection,
        Self::DeviceInfo,
        Self::BackgroundFetch,
        Self::BackgroundSync,
        Self::Bluetooth,
        Self::PersistentStorage,
        Self::AmbientLightSensor,
        Self::Accelerometer,
        Self::Gyroscope,
        Self::Magnetometer,
        Self::ClipboardRead,
        Self::ClipboardWrite,
        Self::ScreenWakeLock,
        Self::DisplayCapture,
    ];

    /// Wire name of the capability
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geolocation => "geolocation",
            Self::Notifications => "notifications",
            Self::Push => "push",
            Self::Midi => "midi",
            Self::Camera => "camera",
            Self::Microphone => "microphone",
            Self::SpeakerSelection => "speaker-selection",
            Self::DeviceInfo => "device-info",
            Self::BackgroundFetch => "background-fetch",
            Self::BackgroundSync => "background-sync",
            Self::Bluetooth => "bluetooth",
            Self::PersistentStorage => "persistent-storage",
            Self::AmbientLightSensor => "ambient-light-sensor",
            Self::Accelerometer => "accelerometer",
            Self::Gyroscope => "gyroscope",
            Self::Magnetometer => "magnetometer",
            Self::ClipboardRead => "clipboard-read",
            Self::ClipboardWrite => "clipboard-write",
            Self::ScreenWakeLock => "screen-wake-lock",
            Self::DisplayCapture => "display-capture",
        }
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionName {
    type Err = UnknownPermissionName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "geolocation" => Ok(Self::Geolocation),
            "notifications" => Ok(Self::Notifications),
            "push" => Ok(Self::Push),
            "midi" => Ok(Self::Midi),
            "camera" => Ok(Self::Camera),
            "microphone" => Ok(Self::Microphone),
            "speaker-selection" => Ok(Self::SpeakerSelection),
            "device-info" => Ok(Self::DeviceInfo),
            "background-fetch" => Ok(Self::BackgroundFetch),
            "background-sync" => Ok(Self::BackgroundSync),
            "bluetooth" => Ok(Self::Bluetooth),
            "persistent-storage" => Ok(Self::PersistentStorage),
            "ambient-light-sensor" => Ok(Self::AmbientLightSensor),
            "accelerometer" => Ok(Self::Accelerometer),
            "gyroscope" => Ok(Self::Gyroscope),
            "magnetometer" => Ok(Self::Magnetometer),
            "clipboard-read" => Ok(Self::ClipboardRead),
            "clipboard-write" => Ok(Self::ClipboardWrite),
            "screen-wake-lock" => Ok(Self::ScreenWakeLock),
            "display-capture" => Ok(Self::DisplayCapture),
            _ => Err(UnknownPermissionName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for name in PermissionName::ALL {
            assert_eq!(name.as_str().parse::<PermissionName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "quantum-link".parse::<PermissionName>().unwrap_err();
        assert_eq!(err, UnknownPermissionName("quantum-link".to_string()));
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(PermissionName::ClipboardRead.to_string(), "clipboard-read");
        assert_eq!(PermissionName::ScreenWakeLock.to_string(), "screen-wake-lock");
    }
}
