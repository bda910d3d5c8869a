//! Settings state and adjustment semantics

use crate::device::{CameraControls, SharedCamera};
use crate::error::Result;
use crate::settings::store::SettingsStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Fixed ascending ladder of allowed shutter speeds in microseconds
pub const SHUTTER_LADDER: [u32; 9] = [
    1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000,
];

/// ISO bounds and step
const ISO_MIN: u16 = 50;
const ISO_MAX: u16 = 800;
const ISO_STEP: u16 = 50;

/// Brightness gain bounds and step
const BRIGHTNESS_MIN: f32 = 0.5;
const BRIGHTNESS_MAX: f32 = 1.5;
const BRIGHTNESS_STEP: f32 = 0.1;

/// Focus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMode {
    /// Continuous autofocus
    Auto,
    /// Fixed manual focus
    Manual,
}

impl FocusMode {
    /// Flip to the other mode
    pub fn toggled(self) -> Self {
        match self {
            FocusMode::Auto => FocusMode::Manual,
            FocusMode::Manual => FocusMode::Auto,
        }
    }

    /// Two-letter tag for the status overlay
    pub fn tag(self) -> &'static str {
        match self {
            FocusMode::Auto => "AF",
            FocusMode::Manual => "MF",
        }
    }
}

/// Exposure mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureMode {
    /// Sensor auto-exposure loop
    Auto,
    /// Manual gain and shutter
    Manual,
}

impl ExposureMode {
    /// Flip to the other mode
    pub fn toggled(self) -> Self {
        match self {
            ExposureMode::Auto => ExposureMode::Manual,
            ExposureMode::Manual => ExposureMode::Auto,
        }
    }
}

/// Camera parameter state, persisted as a flat JSON record
///
/// Switching exposure to Auto preserves the stored ISO/shutter values, so a
/// later return to Manual resumes where the user left off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    /// ISO, 50–800 in steps of 50, wrapping; effective only in manual exposure
    pub iso: u16,
    /// Shutter time in microseconds, one of [`SHUTTER_LADDER`]
    pub shutter_micros: u32,
    /// Preview brightness gain, 0.5–1.5 in steps of 0.1, wrapping
    pub brightness_gain: f32,
    /// Focus mode
    pub focus: FocusMode,
    /// Exposure mode
    pub exposure: ExposureMode,
    /// Index into the built-in profile list, if one was applied last
    pub active_profile: Option<usize>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            iso: 100,
            shutter_micros: 10_000,
            brightness_gain: 1.0,
            focus: FocusMode::Auto,
            exposure: ExposureMode::Auto,
            active_profile: None,
        }
    }
}

impl SettingsState {
    /// Snap every field onto its legal grid
    ///
    /// Persisted records are untrusted input: a hand-edited or stale file
    /// can carry values the adjustment arithmetic was never written for
    /// (an ISO near `u16::MAX` would overflow the next Increase step).
    pub fn sanitized(mut self) -> Self {
        self.iso = (self.iso.clamp(ISO_MIN, ISO_MAX) / ISO_STEP) * ISO_STEP;
        if !SHUTTER_LADDER.contains(&self.shutter_micros) {
            self.shutter_micros = SHUTTER_LADDER
                .iter()
                .copied()
                .min_by_key(|&s| s.abs_diff(self.shutter_micros))
                .unwrap_or(SHUTTER_LADDER[0]);
        }
        self.brightness_gain = if self.brightness_gain.is_finite() {
            ((self.brightness_gain * 10.0).round() / 10.0)
                .clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX)
        } else {
            1.0
        };
        if self.active_profile.is_some_and(|i| i >= PROFILES.len()) {
            self.active_profile = None;
        }
        self
    }

    /// Effective control set to push to the camera
    pub fn controls(&self) -> CameraControls {
        CameraControls {
            auto_exposure: self.exposure == ExposureMode::Auto,
            auto_focus: self.focus == FocusMode::Auto,
            analog_gain: f32::from(self.iso) / 100.0,
            exposure_micros: self.shutter_micros,
        }
    }
}

/// A named preset replacing the whole parameter set when applied
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// Display name
    pub name: &'static str,
    /// Exposure mode the profile selects
    pub exposure: ExposureMode,
    /// ISO when manual
    pub iso: u16,
    /// Shutter when manual
    pub shutter_micros: u32,
    /// Brightness gain
    pub brightness_gain: f32,
    /// Focus mode
    pub focus: FocusMode,
}

/// Built-in profiles, ordered as they cycle
pub const PROFILES: [Profile; 3] = [
    Profile {
        name: "Daylight",
        exposure: ExposureMode::Manual,
        iso: 100,
        shutter_micros: 10_000,
        brightness_gain: 1.0,
        focus: FocusMode::Auto,
    },
    Profile {
        name: "Indoors",
        exposure: ExposureMode::Manual,
        iso: 200,
        shutter_micros: 50_000,
        brightness_gain: 1.1,
        focus: FocusMode::Auto,
    },
    Profile {
        name: "Low Light",
        exposure: ExposureMode::Manual,
        iso: 400,
        shutter_micros: 250_000,
        brightness_gain: 1.3,
        focus: FocusMode::Manual,
    },
];

/// Items the settings menu can select, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    /// Preview brightness gain
    Brightness,
    /// AF / MF
    FocusMode,
    /// Auto / manual exposure
    ExposureMode,
    /// Sensor gain (manual exposure only)
    Iso,
    /// Shutter time (manual exposure only)
    Shutter,
    /// Named preset cycling
    Profile,
}

impl SettingsItem {
    /// All items in menu order
    pub const ALL: [SettingsItem; 6] = [
        SettingsItem::Brightness,
        SettingsItem::FocusMode,
        SettingsItem::ExposureMode,
        SettingsItem::Iso,
        SettingsItem::Shutter,
        SettingsItem::Profile,
    ];

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            SettingsItem::Brightness => "Brightness",
            SettingsItem::FocusMode => "Focus Mode",
            SettingsItem::ExposureMode => "Exposure",
            SettingsItem::Iso => "ISO",
            SettingsItem::Shutter => "Shutter",
            SettingsItem::Profile => "Profile",
        }
    }

    /// Current value rendered for the settings overlay
    pub fn value_text(self, state: &SettingsState) -> String {
        match self {
            SettingsItem::Brightness => format!("{:.1}", state.brightness_gain),
            SettingsItem::FocusMode => state.focus.tag().to_string(),
            SettingsItem::ExposureMode => match state.exposure {
                ExposureMode::Auto => "AUTO".to_string(),
                ExposureMode::Manual => "MANUAL".to_string(),
            },
            SettingsItem::Iso => match state.exposure {
                ExposureMode::Auto => "AUTO".to_string(),
                ExposureMode::Manual => state.iso.to_string(),
            },
            SettingsItem::Shutter => match state.exposure {
                ExposureMode::Auto => "AUTO".to_string(),
                ExposureMode::Manual => format!("{}ms", state.shutter_micros / 1000),
            },
            SettingsItem::Profile => match state.active_profile {
                Some(i) => PROFILES[i % PROFILES.len()].name.to_string(),
                None => "-".to_string(),
            },
        }
    }
}

/// Adjustment direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Step up / next
    Increase,
    /// Step down / previous
    Decrease,
}

/// Apply one adjustment step to `state`. Pure; no side effects.
///
/// ISO and shutter steps are no-ops (still successful) while exposure is
/// Auto. Profile steps replace the entire parameter set with the profile's
/// snapshot.
pub fn apply_adjust(state: &mut SettingsState, item: SettingsItem, direction: Direction) {
    match item {
        SettingsItem::Brightness => {
            let step = match direction {
                Direction::Increase => BRIGHTNESS_STEP,
                Direction::Decrease => -BRIGHTNESS_STEP,
            };
            // Round to one decimal so repeated float steps cannot drift past
            // the wrap comparison.
            let mut gain = ((state.brightness_gain + step) * 10.0).round() / 10.0;
            if gain > BRIGHTNESS_MAX + f32::EPSILON {
                gain = BRIGHTNESS_MIN;
            } else if gain < BRIGHTNESS_MIN - f32::EPSILON {
                gain = BRIGHTNESS_MAX;
            }
            state.brightness_gain = gain;
        }
        SettingsItem::FocusMode => {
            state.focus = state.focus.toggled();
        }
        SettingsItem::ExposureMode => {
            // Manual values are preserved across a trip through Auto
            state.exposure = state.exposure.toggled();
        }
        SettingsItem::Iso => {
            if state.exposure == ExposureMode::Manual {
                state.iso = match direction {
                    Direction::Increase => {
                        let next = state.iso + ISO_STEP;
                        if next > ISO_MAX { ISO_MIN } else { next }
                    }
                    Direction::Decrease => {
                        if state.iso <= ISO_MIN {
                            ISO_MAX
                        } else {
                            state.iso - ISO_STEP
                        }
                    }
                };
            }
        }
        SettingsItem::Shutter => {
            if state.exposure == ExposureMode::Manual {
                let len = SHUTTER_LADDER.len();
                let current = SHUTTER_LADDER
                    .iter()
                    .position(|&s| s == state.shutter_micros)
                    .unwrap_or(0);
                let next = match direction {
                    Direction::Increase => (current + 1) % len,
                    Direction::Decrease => (current + len - 1) % len,
                };
                state.shutter_micros = SHUTTER_LADDER[next];
            }
        }
        SettingsItem::Profile => {
            let len = PROFILES.len();
            let next = match (state.active_profile, direction) {
                (Some(i), Direction::Increase) => (i + 1) % len,
                (Some(i), Direction::Decrease) => (i + len - 1) % len,
                (None, Direction::Increase) => 0,
                (None, Direction::Decrease) => len - 1,
            };
            let profile = &PROFILES[next];
            state.exposure = profile.exposure;
            state.iso = profile.iso;
            state.shutter_micros = profile.shutter_micros;
            state.brightness_gain = profile.brightness_gain;
            state.focus = profile.focus;
            state.active_profile = Some(next);
        }
    }
}

/// Settings service: applies adjustments, pushes camera controls, persists
///
/// Operates on the `SettingsState` living inside the shared UI state; the
/// caller holds the lock while calling in.
pub struct SettingsModel {
    camera: SharedCamera,
    store: SettingsStore,
}

impl SettingsModel {
    /// Create the model around a camera handle and a persistence store
    pub fn new(camera: SharedCamera, store: SettingsStore) -> Self {
        Self { camera, store }
    }

    /// Adjust one item one step, push the resulting controls, save best-effort
    ///
    /// Control-push and persistence failures are logged and do not roll
    /// back the in-memory change.
    pub fn adjust(
        &self,
        state: &mut SettingsState,
        item: SettingsItem,
        direction: Direction,
    ) -> Result<()> {
        apply_adjust(state, item, direction);
        debug!(
            "Adjusted {}: {}",
            item.label(),
            item.value_text(state)
        );
        self.push_and_persist(state);
        Ok(())
    }

    /// Flip focus mode outside the settings menu (Photo-mode shortcut)
    pub fn toggle_focus(&self, state: &mut SettingsState) {
        state.focus = state.focus.toggled();
        info!("Focus mode: {}", state.focus.tag());
        self.push_and_persist(state);
    }

    /// Push the current control set to the camera without persisting
    /// (startup path, after loading saved settings)
    pub fn apply(&self, state: &SettingsState) {
        if let Err(e) = self.camera.lock().apply_controls(&state.controls()) {
            warn!("Failed to push camera controls: {}", e);
        }
    }

    fn push_and_persist(&self, state: &SettingsState) {
        self.apply(state);
        if let Err(e) = self.store.save(state) {
            warn!(
                "Failed to save settings, in-memory state stands: {}",
                e
            );
        }
    }
}
