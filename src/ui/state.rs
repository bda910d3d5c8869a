//! Shared UI state

use crate::gallery::GallerySelection;
use crate::input::ButtonId;
use crate::settings::SettingsState;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Active UI mode, exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Live preview with capture on A
    Photo,
    /// Settings menu navigation and adjustment
    Settings,
    /// Browsing captured photos
    Gallery,
    /// Armed deletion awaiting confirm/cancel
    ConfirmDelete,
}

impl UiMode {
    /// Lowercase label for the status overlay
    pub fn label(self) -> &'static str {
        match self {
            UiMode::Photo => "photo",
            UiMode::Settings => "settings",
            UiMode::Gallery => "gallery",
            UiMode::ConfirmDelete => "delete?",
        }
    }
}

/// Transient overlay icon, drawn by the preview loop while fresh
#[derive(Debug, Clone)]
pub struct Notice {
    /// Short icon text (one or two characters)
    pub text: String,
    /// When the notice was posted
    pub shown_at: Instant,
}

/// The single mutable aggregate shared between the input dispatcher and
/// the preview loop
///
/// All access is serialized through the surrounding mutex; the preview
/// loop takes a consistent snapshot per tick.
#[derive(Debug)]
pub struct SharedUiState {
    /// Current UI mode
    pub mode: UiMode,
    /// Selected item index in the settings menu
    pub settings_index: usize,
    /// Camera parameter state
    pub settings: SettingsState,
    /// Gallery cursor; `Some` only in Gallery/ConfirmDelete modes
    pub gallery: Option<GallerySelection>,
    /// Whether the live preview is being rendered
    pub preview_enabled: bool,
    /// Instant of the last input event; drives the idle backlight
    pub last_interaction: Instant,
    /// Photo frozen for deletion while in ConfirmDelete
    pub pending_delete: Option<PathBuf>,
    /// Transient overlay icon, if one is fresh
    pub notice: Option<Notice>,
    /// X/Y button whose press arrived while idle; its release is a
    /// wake-only signal and must not navigate
    pub wake_gate: Option<ButtonId>,
    /// One-way shutdown flag both loops observe
    pub shutdown_requested: bool,
}

impl SharedUiState {
    /// Initial state: Photo mode, preview on, idle clock starting now
    pub fn new(settings: SettingsState) -> Self {
        Self {
            mode: UiMode::Photo,
            settings_index: 0,
            settings,
            gallery: None,
            preview_enabled: true,
            last_interaction: Instant::now(),
            pending_delete: None,
            notice: None,
            wake_gate: None,
            shutdown_requested: false,
        }
    }

    /// Post a transient overlay icon
    pub fn post_notice(&mut self, text: impl Into<String>, now: Instant) {
        self.notice = Some(Notice {
            text: text.into(),
            shown_at: now,
        });
    }
}

/// Handle to the shared UI state
pub type SharedState = Arc<Mutex<SharedUiState>>;
