//! `camdeck` - Interaction controller for a four-button camera appliance
//!
//! Turns raw button-line samples into classified input events, runs the
//! mode state machine (photo, settings, gallery, delete confirmation) over
//! one mutex-guarded state aggregate, and renders a steady-rate preview
//! with status overlays. Multi-threaded event-driven architecture: a
//! `ButtonPoller` thread samples and classifies input, the
//! `InteractionController` dispatch loop applies events to the
//! `UiStateMachine`, and a `PreviewScheduler` thread paints the panel.
//!
//! # Hardware assumptions
//!
//! - Four momentary buttons (A, B, X, Y) readable as boolean levels
//! - A small panel with software backlight control
//! - A camera exposing live frames and full-resolution stills

// Module declarations
pub mod controller;
pub mod device;
pub mod error;
pub mod gallery;
pub mod input;
pub mod preview;
pub mod settings;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{CamdeckError, Result};
