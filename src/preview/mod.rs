//! Preview scheduler
//!
//! The steady-rate render loop. Each tick takes a consistent snapshot of
//! the shared UI state, recomputes the idle backlight level, and paints
//! whatever the current mode calls for: a live frame with the status
//! overlay, the selected gallery image with its position, or the delete
//! confirmation prompt. Transient camera or render failures skip the tick
//! and are retried on the next one; the loop only ends on shutdown.

use crate::device::{Frame, Overlay, SharedCamera, SharedDisplay};
use crate::settings::SettingsItem;
use crate::ui::state::{SharedState, UiMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Backlight level while active
const BACKLIGHT_BRIGHT: f32 = 1.0;
/// Backlight level while idle
const BACKLIGHT_DIM: f32 = 0.25;

/// Panel resolution the overlay layout assumes
const PANEL: (u32, u32) = (320, 240);

/// What one tick decided to render, derived from the state snapshot
enum RenderPlan {
    /// Live frame with status overlay
    Live {
        gain: f32,
        overlay: Overlay,
    },
    /// A gallery image from disk
    Stored {
        path: PathBuf,
        overlay: Overlay,
    },
    /// Preview disabled: leave the panel as it is
    Hold,
    /// Shutdown farewell screen; the loop ends after painting it
    Farewell,
}

/// The steady-rate preview/render loop
pub struct PreviewScheduler {
    camera: SharedCamera,
    display: SharedDisplay,
    state: SharedState,
    running: Arc<AtomicBool>,
    interval: Duration,
    idle_timeout: Duration,
    /// How long a transient notice stays on screen
    notice_hold: Duration,
}

impl PreviewScheduler {
    /// Wire the scheduler to its collaborators
    pub fn new(
        camera: SharedCamera,
        display: SharedDisplay,
        state: SharedState,
        running: Arc<AtomicBool>,
        interval: Duration,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            camera,
            display,
            state,
            running,
            interval,
            idle_timeout,
            notice_hold: Duration::from_millis(800),
        }
    }

    /// Start the render thread
    pub fn start(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("preview".into())
            .spawn(move || {
                debug!("Preview loop started ({}ms cadence)", self.interval.as_millis());
                while self.running.load(Ordering::SeqCst) {
                    if !self.tick(Instant::now()) {
                        break;
                    }
                    thread::sleep(self.interval);
                }
                debug!("Preview loop stopped");
            })
            .expect("failed to spawn preview thread")
    }

    /// One render tick. Returns false once the shutdown screen is painted.
    fn tick(&self, now: Instant) -> bool {
        let (plan, idle) = self.plan_tick(now);

        // Recomputed every tick, no hysteresis
        let backlight = if idle { BACKLIGHT_DIM } else { BACKLIGHT_BRIGHT };
        if let Err(e) = self.display.lock().set_backlight(backlight) {
            warn!("Backlight update failed: {}", e);
        }

        match plan {
            RenderPlan::Live { gain, overlay } => self.render_live(gain, &overlay),
            RenderPlan::Stored { path, overlay } => self.render_stored(&path, &overlay),
            RenderPlan::Hold => {}
            RenderPlan::Farewell => {
                self.render_farewell();
                return false;
            }
        }
        true
    }

    /// Snapshot the shared state and decide what this tick renders.
    /// Holds the lock only long enough to copy what the render needs.
    fn plan_tick(&self, now: Instant) -> (RenderPlan, bool) {
        let mut state = self.state.lock();

        let idle = now.duration_since(state.last_interaction) > self.idle_timeout;

        if state.shutdown_requested {
            return (RenderPlan::Farewell, idle);
        }

        // Expire a stale notice while we hold the lock
        if state
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) > self.notice_hold)
        {
            state.notice = None;
        }
        let notice = state.notice.as_ref().map(|n| n.text.clone());

        let plan = match state.mode {
            UiMode::Gallery | UiMode::ConfirmDelete => {
                match state.gallery.as_ref() {
                    Some(gallery) => RenderPlan::Stored {
                        path: gallery.current().to_path_buf(),
                        overlay: Overlay {
                            header: gallery.position_text(),
                            corner: notice,
                            footer: (state.mode == UiMode::ConfirmDelete)
                                .then(|| "Delete photo?  A=yes  B=no".to_string()),
                        },
                    },
                    // Gallery mode with no selection cannot normally happen;
                    // fall back rather than wedge.
                    None => {
                        warn!("Gallery mode without a selection, falling back to photo");
                        state.mode = UiMode::Photo;
                        RenderPlan::Hold
                    }
                }
            }
            UiMode::Photo | UiMode::Settings if state.preview_enabled => {
                let settings_line = (state.mode == UiMode::Settings).then(|| {
                    let item = SettingsItem::ALL[state.settings_index];
                    format!("{}: {}", item.label(), item.value_text(&state.settings))
                });
                RenderPlan::Live {
                    gain: state.settings.brightness_gain,
                    overlay: Overlay {
                        header: format!("Mode: {}", state.mode.label()),
                        corner: notice.or_else(|| Some(state.settings.focus.tag().to_string())),
                        footer: settings_line,
                    },
                }
            }
            _ => RenderPlan::Hold,
        };

        (plan, idle)
    }

    /// Pull one live frame, apply the brightness gain, paint it
    fn render_live(&self, gain: f32, overlay: &Overlay) {
        let frame = match self.camera.lock().capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                // Transient: skip this tick, retry on the next
                warn!("Frame capture failed, skipping tick: {}", e);
                return;
            }
        };
        let frame = apply_gain(frame, gain);
        if let Err(e) = self.display.lock().paint(&frame, overlay) {
            warn!("Paint failed, skipping tick: {}", e);
        }
    }

    /// Load and paint the selected gallery image; an unreadable file drops
    /// the UI back to Photo mode rather than wedging on a broken view
    fn render_stored(&self, path: &std::path::Path, overlay: &Overlay) {
        let image = match image::open(path) {
            Ok(image) => image.to_rgb8(),
            Err(e) => {
                warn!("Gallery image {} unreadable, back to photo mode: {}", path.display(), e);
                let mut state = self.state.lock();
                state.mode = UiMode::Photo;
                state.gallery = None;
                state.pending_delete = None;
                return;
            }
        };
        if let Err(e) = self.display.lock().paint(&image, overlay) {
            warn!("Paint failed, skipping tick: {}", e);
        }
    }

    /// Final screen of the shutdown transition
    fn render_farewell(&self) {
        info!("Painting shutdown screen");
        let frame = Frame::new(PANEL.0, PANEL.1);
        let overlay = Overlay {
            header: "Shutting down...".to_string(),
            corner: None,
            footer: None,
        };
        let mut display = self.display.lock();
        if let Err(e) = display.paint(&frame, &overlay) {
            warn!("Failed to paint shutdown screen: {}", e);
        }
        let _ = display.set_backlight(BACKLIGHT_BRIGHT);
    }
}

/// Scale every channel by `gain`, saturating at white
fn apply_gain(mut frame: Frame, gain: f32) -> Frame {
    if (gain - 1.0).abs() < f32::EPSILON {
        return frame;
    }
    for pixel in frame.pixels_mut() {
        pixel.0 = pixel.0.map(|c| {
            let scaled = f32::from(c) * gain;
            if scaled >= 255.0 { 255 } else { scaled as u8 }
        });
    }
    frame
}
