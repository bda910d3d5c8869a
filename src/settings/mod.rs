//! Camera settings model and persistence
//!
//! Holds the camera parameter state (ISO, shutter, brightness gain, focus
//! and exposure modes) plus the built-in profile list, and implements the
//! bounded/wrapping adjustment semantics the settings menu exposes. Every
//! successful adjustment is pushed to the camera and saved to disk
//! best-effort; a failed save never rolls back the in-memory state.

pub mod model;
pub mod store;

pub use model::{
    Direction, ExposureMode, FocusMode, PROFILES, Profile, SHUTTER_LADDER, SettingsItem,
    SettingsModel, SettingsState,
};
pub use store::SettingsStore;
