//! Runtime assembly and the main event dispatch loop
//!
//! [`InteractionController`] owns the shared UI state and the two worker
//! threads. The poller thread samples the button lines and classifies
//! edges into events; this controller's own loop receives those events
//! and feeds them to the state machine; the preview thread renders at a
//! steady rate from the same shared state. Exactly one thread mutates
//! state per event, so the mutex is the only coordination needed.

use crate::device::{SharedCamera, SharedDisplay};
use crate::gallery::PhotoStore;
use crate::input::{ButtonPoller, ClassifierConfig, EventClassifier, InputEvent};
use crate::preview::PreviewScheduler;
use crate::settings::{SettingsModel, SettingsStore};
use crate::ui::{SharedState, SharedUiState, UiStateMachine};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Capacity of the input event channel; classified events are rare
/// (humans press buttons), so a small bound is plenty
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Timing knobs for the runtime, defaulted to the hardware cadences
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Button sampling interval
    pub poll_interval: Duration,
    /// Preview render interval
    pub preview_interval: Duration,
    /// Inactivity span before the backlight dims
    pub idle_timeout: Duration,
    /// Double-press and hold-combo windows
    pub classifier: ClassifierConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            preview_interval: Duration::from_millis(100),
            idle_timeout: Duration::from_secs(70),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Why the dispatch loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user requested shutdown (double press on Y)
    Shutdown,
    /// The poller thread went away and no more input can arrive
    InputChannelClosed,
}

/// Owns the shared state and the worker threads
pub struct InteractionController {
    camera: SharedCamera,
    display: SharedDisplay,
    state: SharedState,
    state_machine: UiStateMachine,
    running: Arc<AtomicBool>,
    tuning: Tuning,
}

impl InteractionController {
    /// Assemble the runtime: load persisted settings, push them to the
    /// camera, and build the state machine around the shared state
    pub fn new(
        camera: SharedCamera,
        display: SharedDisplay,
        photos: PhotoStore,
        settings_store: SettingsStore,
        tuning: Tuning,
    ) -> Self {
        if let Err(e) = camera.lock().configure(crate::device::PREVIEW_RESOLUTION) {
            warn!("Failed to configure the preview stream: {}", e);
        }

        let settings = settings_store.load().unwrap_or_default();
        let model = SettingsModel::new(camera.clone(), settings_store);
        model.apply(&settings);

        let state: SharedState = Arc::new(Mutex::new(SharedUiState::new(settings)));
        let state_machine =
            UiStateMachine::new(camera.clone(), photos, model, tuning.idle_timeout);

        Self {
            camera,
            display,
            state,
            state_machine,
            running: Arc::new(AtomicBool::new(true)),
            tuning,
        }
    }

    /// Handle to the shared UI state
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Spawn the worker threads and run the dispatch loop on the calling
    /// thread until shutdown. Both workers are joined before returning.
    pub fn run(&self) -> ExitReason {
        let (event_sender, event_receiver) =
            mpsc::sync_channel::<InputEvent>(EVENT_CHANNEL_CAPACITY);

        let poller = ButtonPoller::new(
            self.display.clone(),
            EventClassifier::new(self.tuning.classifier),
            event_sender,
            self.tuning.poll_interval,
            self.running.clone(),
        );
        let poller_handle = poller.start();

        let preview = PreviewScheduler::new(
            self.camera.clone(),
            self.display.clone(),
            self.state.clone(),
            self.running.clone(),
            self.tuning.preview_interval,
            self.tuning.idle_timeout,
        );
        let preview_handle = preview.start();

        info!("Entering input dispatch loop");
        let reason = self.dispatch_loop(&event_receiver);
        info!("Input dispatch loop exited: {:?}", reason);

        if reason == ExitReason::Shutdown {
            // The preview loop ends on its own once it paints the
            // shutdown screen; join it before stopping the poller so the
            // screen is guaranteed to appear.
            if preview_handle.join().is_err() {
                warn!("Preview thread panicked during shutdown");
            }
            self.running.store(false, Ordering::SeqCst);
            if poller_handle.join().is_err() {
                warn!("Poller thread panicked during shutdown");
            }
        } else {
            self.running.store(false, Ordering::SeqCst);
            for (name, handle) in [("preview", preview_handle), ("poller", poller_handle)] {
                if handle.join().is_err() {
                    warn!("{name} thread panicked during shutdown");
                }
            }
        }
        reason
    }

    /// Receive classified events and feed them to the state machine until
    /// shutdown is requested or the channel closes
    fn dispatch_loop(&self, events: &mpsc::Receiver<InputEvent>) -> ExitReason {
        use mpsc::RecvTimeoutError;

        loop {
            match events.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    let mut state = self.state.lock();
                    self.state_machine
                        .handle_event(&mut state, event, Instant::now());
                    if state.shutdown_requested {
                        return ExitReason::Shutdown;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Normal cadence; re-check the shutdown flag
                    if self.state.lock().shutdown_requested {
                        return ExitReason::Shutdown;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Input event channel disconnected");
                    return ExitReason::InputChannelClosed;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::{SimCamera, SimDisplay};
    use crate::input::ButtonId;
    use crate::ui::UiMode;
    use std::thread;

    fn controller(dir: &std::path::Path) -> (InteractionController, Arc<Mutex<SimDisplay>>) {
        let camera = Arc::new(Mutex::new(SimCamera::new()));
        let display = Arc::new(Mutex::new(SimDisplay::new()));
        let photos = PhotoStore::new(dir.join("photos")).unwrap();
        let store = SettingsStore::new(dir.join("settings.json"));
        let tuning = Tuning {
            poll_interval: Duration::from_millis(5),
            preview_interval: Duration::from_millis(10),
            ..Default::default()
        };
        let controller =
            InteractionController::new(camera, display.clone(), photos, store, tuning);
        (controller, display)
    }

    #[test]
    fn double_press_on_y_shuts_the_runtime_down() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, display) = controller(dir.path());
        let state = controller.state();

        let runtime = thread::spawn(move || controller.run());

        // Two fast presses on Y, within the double-press window
        for _ in 0..2 {
            display.lock().set_button(ButtonId::Y, true);
            thread::sleep(Duration::from_millis(30));
            display.lock().set_button(ButtonId::Y, false);
            thread::sleep(Duration::from_millis(30));
        }

        let reason = runtime.join().unwrap();
        assert_eq!(reason, ExitReason::Shutdown);
        assert!(state.lock().shutdown_requested);

        // The last painted screen is the farewell
        let overlays = display.lock().overlays().to_vec();
        assert_eq!(overlays.last().unwrap().header, "Shutting down...");
    }

    #[test]
    fn startup_state_is_photo_mode_with_preview_on() {
        let dir = tempfile::tempdir().unwrap();
        let (controller, _display) = controller(dir.path());
        let state = controller.state();
        let state = state.lock();
        assert_eq!(state.mode, UiMode::Photo);
        assert!(state.preview_enabled);
        assert!(!state.shutdown_requested);
    }
}
