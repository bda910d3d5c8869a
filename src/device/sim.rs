//! Simulated devices
//!
//! Stand-ins for the camera sensor and the display panel, used by the
//! binary when no appliance hardware is present and by the test suite as
//! scriptable fakes. The simulated camera renders a moving gradient so the
//! preview loop has something to chew on; the simulated display records
//! what it was asked to paint.

use crate::device::{Camera, CameraControls, Display, Frame, Overlay, Resolution};
use crate::error::{CamdeckError, Result, StringError};
use crate::input::ButtonId;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Simulated camera producing synthetic gradient frames
pub struct SimCamera {
    resolution: Resolution,
    controls: Option<CameraControls>,
    frame_counter: u64,
    /// Paths of stills captured so far
    stills: Vec<PathBuf>,
    fail_still: bool,
    fail_frame: bool,
}

impl SimCamera {
    /// Create a simulated camera at the default preview resolution
    pub fn new() -> Self {
        Self {
            resolution: super::PREVIEW_RESOLUTION,
            controls: None,
            frame_counter: 0,
            stills: Vec::new(),
            fail_still: false,
            fail_frame: false,
        }
    }

    /// Make subsequent still captures fail (for failure-path tests)
    pub fn fail_stills(&mut self, fail: bool) {
        self.fail_still = fail;
    }

    /// Make subsequent frame captures fail (for failure-path tests)
    pub fn fail_frames(&mut self, fail: bool) {
        self.fail_frame = fail;
    }

    /// Paths of all stills captured so far
    pub fn stills(&self) -> &[PathBuf] {
        &self.stills
    }

    /// Last control set pushed to the sensor, if any
    pub fn controls(&self) -> Option<&CameraControls> {
        self.controls.as_ref()
    }
}

impl Default for SimCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for SimCamera {
    fn configure(&mut self, resolution: Resolution) -> Result<()> {
        debug!("SimCamera configured at {}x{}", resolution.width, resolution.height);
        self.resolution = resolution;
        Ok(())
    }

    fn apply_controls(&mut self, controls: &CameraControls) -> Result<()> {
        debug!("SimCamera controls: {:?}", controls);
        self.controls = Some(*controls);
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame> {
        if self.fail_frame {
            return Err(CamdeckError::FrameCapture(StringError::new(
                "simulated frame failure",
            )));
        }
        self.frame_counter += 1;
        let phase = (self.frame_counter % 256) as u8;
        let frame = Frame::from_fn(self.resolution.width, self.resolution.height, |x, y| {
            image::Rgb([
                (x % 256) as u8,
                (y % 256) as u8,
                phase,
            ])
        });
        Ok(frame)
    }

    fn capture_still(&mut self, path: &Path) -> Result<()> {
        if self.fail_still {
            return Err(CamdeckError::StillCapture(StringError::new(
                "simulated still failure",
            )));
        }
        let frame = self.capture_frame()?;
        frame
            .save(path)
            .map_err(|e| CamdeckError::StillCapture(Box::new(e)))?;
        self.stills.push(path.to_path_buf());
        Ok(())
    }
}

/// Simulated display recording paints and exposing scriptable button levels
pub struct SimDisplay {
    buttons: [bool; 4],
    fail_reads: bool,
    backlight: f32,
    /// Overlays painted so far, newest last
    overlays: Vec<Overlay>,
}

impl SimDisplay {
    /// Create a simulated display with all buttons released
    pub fn new() -> Self {
        Self {
            buttons: [false; 4],
            fail_reads: false,
            backlight: 1.0,
            overlays: Vec::new(),
        }
    }

    /// Script a button level
    pub fn set_button(&mut self, button: ButtonId, pressed: bool) {
        self.buttons[button.index()] = pressed;
    }

    /// Make subsequent button reads fail (for fail-safe tests)
    pub fn fail_button_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Current backlight level
    pub fn backlight(&self) -> f32 {
        self.backlight
    }

    /// Overlays painted so far, newest last
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SimDisplay {
    fn paint(&mut self, _frame: &Frame, overlay: &Overlay) -> Result<()> {
        self.overlays.push(overlay.clone());
        Ok(())
    }

    fn set_backlight(&mut self, level: f32) -> Result<()> {
        self.backlight = level;
        Ok(())
    }

    fn read_button(&mut self, button: ButtonId) -> Result<bool> {
        if self.fail_reads {
            return Err(CamdeckError::ButtonRead(StringError::new(
                "simulated line failure",
            )));
        }
        Ok(self.buttons[button.index()])
    }
}
