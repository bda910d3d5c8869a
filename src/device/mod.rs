//! Device trait seams
//!
//! The interaction core drives the camera and the display panel through
//! narrow traits so the control logic never touches driver protocols. The
//! appliance binary plugs in real (or simulated) hardware; tests plug in
//! scriptable fakes.
//!
//! Both handles are shared between threads behind `Arc<Mutex<..>>`: the
//! input poller reads button lines while the preview loop paints, and the
//! event dispatcher captures stills. The mutex serializes access to the
//! physical device, matching the single-bus reality of the panel.

pub mod sim;

use crate::error::Result;
use crate::input::ButtonId;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Camera handle shared between the preview loop and the event dispatcher
pub type SharedCamera = Arc<Mutex<dyn Camera>>;

/// Display handle shared between the input poller and the preview loop
pub type SharedDisplay = Arc<Mutex<dyn Display>>;

/// Frame buffer type used throughout the core
pub type Frame = image::RgbImage;

/// Sensor resolution for preview configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Default preview resolution (matches the appliance sensor preview stream)
pub const PREVIEW_RESOLUTION: Resolution = Resolution {
    width: 640,
    height: 480,
};

/// Effective control set pushed to the camera after a settings change
///
/// When `auto_exposure` is true the gain/exposure fields are advisory only;
/// the sensor's own AE loop takes over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraControls {
    /// Automatic exposure enabled
    pub auto_exposure: bool,
    /// Autofocus enabled
    pub auto_focus: bool,
    /// Analog gain (ISO / 100)
    pub analog_gain: f32,
    /// Exposure time in microseconds
    pub exposure_micros: u32,
}

/// Camera collaborator: frame source and still capture
pub trait Camera: Send {
    /// Configure the preview stream resolution
    fn configure(&mut self, resolution: Resolution) -> Result<()>;

    /// Push an effective control set to the sensor
    fn apply_controls(&mut self, controls: &CameraControls) -> Result<()>;

    /// Capture one live preview frame
    fn capture_frame(&mut self) -> Result<Frame>;

    /// Capture a full-resolution still to `path`
    fn capture_still(&mut self, path: &Path) -> Result<()>;
}

/// Text overlay handed to the display together with a frame
///
/// Font rendering belongs to the display driver; the core only decides what
/// the overlay says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Top status bar text (mode, or gallery position)
    pub header: String,
    /// Short tag in the top-right corner (AF/MF indicator or a notice icon)
    pub corner: Option<String>,
    /// Bottom bar text (selected settings item, or the delete prompt)
    pub footer: Option<String>,
}

/// Display collaborator: panel, backlight, and the four button lines
///
/// The Display HAT wires its buttons through the same driver as the panel,
/// so button reads live on this trait rather than a separate one.
pub trait Display: Send {
    /// Paint a frame with its overlay to the panel
    fn paint(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()>;

    /// Set backlight level, 0.0 (off) to 1.0 (full)
    fn set_backlight(&mut self, level: f32) -> Result<()>;

    /// Sample the logical level of one button line (true = pressed)
    fn read_button(&mut self, button: ButtonId) -> Result<bool>;
}
