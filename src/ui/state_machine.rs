//! The UI state machine
//!
//! Consumes classified input events and applies the mode transition table:
//! capture and preview toggling in Photo mode, menu navigation and
//! adjustment in Settings, clamped browsing in Gallery, and the hold-combo
//! guarded delete confirmation. Every event resets the idle timer; while
//! idle, a bare X/Y release is treated purely as a wake signal.

use crate::device::SharedCamera;
use crate::gallery::{GallerySelection, PhotoStore};
use crate::input::{ButtonId, EventKind, InputEvent};
use crate::settings::{Direction, SettingsItem, SettingsModel};
use crate::ui::state::{SharedUiState, UiMode};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Consumes input events and mutates the shared UI state
pub struct UiStateMachine {
    camera: SharedCamera,
    photos: PhotoStore,
    settings: SettingsModel,
    idle_timeout: Duration,
}

impl UiStateMachine {
    /// Wire the state machine to its collaborators
    pub fn new(
        camera: SharedCamera,
        photos: PhotoStore,
        settings: SettingsModel,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            camera,
            photos,
            settings,
            idle_timeout,
        }
    }

    /// Handle one input event against the current state
    pub fn handle_event(&self, state: &mut SharedUiState, event: InputEvent, now: Instant) {
        let was_idle =
            now.duration_since(state.last_interaction) > self.idle_timeout;
        state.last_interaction = now;

        // Idle gate: a bare X/Y tap on a dimmed screen only wakes it.
        // Idleness is decided at the press edge and latched, since the
        // classified Release arrives a double-press window later, by which
        // point the press itself has already reset the idle timer.
        if was_idle
            && event.kind == EventKind::Press
            && matches!(event.button, ButtonId::X | ButtonId::Y)
        {
            state.wake_gate = Some(event.button);
        }
        if state.wake_gate == Some(event.button) {
            match event.kind {
                // The press edge carries no action of its own
                EventKind::Press => {}
                EventKind::Release => {
                    state.wake_gate = None;
                    return;
                }
                // Double presses and the hold combo pass through awake
                _ => state.wake_gate = None,
            }
        }
        // A Release delivered while still idle (the button was held through
        // the timeout) is also just a wake.
        if was_idle
            && event.kind == EventKind::Release
            && matches!(event.button, ButtonId::X | ButtonId::Y)
        {
            return;
        }

        match state.mode {
            UiMode::Photo => self.handle_photo(state, event, now),
            UiMode::Settings => self.handle_settings(state, event, now),
            UiMode::Gallery => self.handle_gallery(state, event),
            UiMode::ConfirmDelete => self.handle_confirm_delete(state, event, now),
        }
    }

    fn handle_photo(&self, state: &mut SharedUiState, event: InputEvent, now: Instant) {
        match (event.button, event.kind) {
            (ButtonId::A, EventKind::Release) => self.capture_still(state, now),
            (ButtonId::A, EventKind::DoublePress) => {
                state.preview_enabled = !state.preview_enabled;
                info!("Preview {}", if state.preview_enabled { "on" } else { "off" });
                state.post_notice(if state.preview_enabled { ">" } else { "#" }, now);
            }
            (ButtonId::B, EventKind::Release) => self.enter_gallery(state),
            (ButtonId::B, EventKind::DoublePress) => {
                state.mode = UiMode::Settings;
                state.settings_index = 0;
                info!("Entering settings mode");
            }
            (ButtonId::X, EventKind::DoublePress) => {
                self.settings.toggle_focus(&mut state.settings);
                state.post_notice(state.settings.focus.tag(), now);
            }
            (ButtonId::Y, EventKind::DoublePress) => {
                info!("Shutdown requested");
                state.shutdown_requested = true;
            }
            _ => {}
        }
    }

    fn handle_settings(&self, state: &mut SharedUiState, event: InputEvent, now: Instant) {
        let item_count = SettingsItem::ALL.len();
        match (event.button, event.kind) {
            (ButtonId::X, EventKind::Release) => {
                state.settings_index = (state.settings_index + item_count - 1) % item_count;
            }
            (ButtonId::Y, EventKind::Release) => {
                state.settings_index = (state.settings_index + 1) % item_count;
            }
            (ButtonId::X, EventKind::DoublePress) => {
                self.adjust_current(state, Direction::Decrease, now);
            }
            (ButtonId::Y, EventKind::DoublePress) => {
                self.adjust_current(state, Direction::Increase, now);
            }
            (ButtonId::B, EventKind::DoublePress) => {
                state.mode = UiMode::Photo;
                // Leaving settings with preview off would strand the user on
                // a dark screen with no visible feedback.
                state.preview_enabled = true;
                info!("Leaving settings mode");
            }
            _ => {}
        }
    }

    fn handle_gallery(&self, state: &mut SharedUiState, event: InputEvent) {
        match (event.button, event.kind) {
            (ButtonId::A, EventKind::Release) => {
                state.mode = UiMode::Photo;
                state.gallery = None;
                info!("Leaving gallery");
            }
            (ButtonId::X, EventKind::Release) => {
                if let Some(gallery) = state.gallery.as_mut() {
                    gallery.select_previous();
                }
            }
            (ButtonId::Y, EventKind::Release) => {
                if let Some(gallery) = state.gallery.as_mut() {
                    gallery.select_next();
                }
            }
            (_, EventKind::HoldCombo { .. }) => {
                if let Some(target) = state.gallery.as_ref().map(|g| g.current().to_path_buf()) {
                    info!("Delete armed for {}", target.display());
                    state.pending_delete = Some(target);
                    state.mode = UiMode::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&self, state: &mut SharedUiState, event: InputEvent, now: Instant) {
        match (event.button, event.kind) {
            (ButtonId::A, EventKind::Release) => self.perform_delete(state, now),
            (ButtonId::B, EventKind::Release) => {
                state.pending_delete = None;
                state.mode = UiMode::Gallery;
                info!("Delete cancelled");
            }
            _ => {}
        }
    }

    /// Capture a still to a fresh timestamped path
    fn capture_still(&self, state: &mut SharedUiState, now: Instant) {
        let path = self.photos.new_still_path();
        match self.camera.lock().capture_still(&path) {
            Ok(()) => {
                info!("Captured {}", path.display());
                state.post_notice("OK", now);
            }
            Err(e) => {
                warn!("Still capture failed: {}", e);
                state.post_notice("X", now);
            }
        }
    }

    /// Enter Gallery mode if there is at least one photo
    ///
    /// The selection is rebuilt from a fresh listing on every entry; the
    /// most recent photo is selected.
    fn enter_gallery(&self, state: &mut SharedUiState) {
        let paths = match self.photos.list_images() {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to list photos: {}", e);
                return;
            }
        };
        match GallerySelection::new(paths) {
            Some(selection) => {
                info!("Entering gallery ({} photos)", selection.len());
                state.gallery = Some(selection);
                state.mode = UiMode::Gallery;
            }
            None => {
                info!("No photos to browse");
            }
        }
    }

    fn adjust_current(&self, state: &mut SharedUiState, direction: Direction, now: Instant) {
        let item = SettingsItem::ALL[state.settings_index];
        if let Err(e) = self
            .settings
            .adjust(&mut state.settings, item, direction)
        {
            warn!("Adjust failed for {}: {}", item.label(), e);
            return;
        }
        state.post_notice(item.value_text(&state.settings), now);
    }

    /// Delete the frozen target and return to Gallery (or Photo when the
    /// listing is now empty). A storage failure keeps the item listed.
    fn perform_delete(&self, state: &mut SharedUiState, now: Instant) {
        let Some(path) = state.pending_delete.take() else {
            state.mode = UiMode::Gallery;
            return;
        };

        if let Err(e) = self.photos.delete(&path) {
            warn!("Delete failed, keeping item listed: {}", e);
            state.mode = UiMode::Gallery;
            return;
        }

        state.gallery = state.gallery.take().and_then(|g| g.without(&path));
        state.post_notice("DEL", now);
        state.mode = if state.gallery.is_some() {
            UiMode::Gallery
        } else {
            info!("Gallery empty after delete, back to photo mode");
            UiMode::Photo
        };
    }
}
