//! `camdeck` - Interaction controller for a four-button camera appliance
//!
//! Binary entry point: initializes logging, loads persisted settings,
//! wires the camera and display behind their trait objects, and runs the
//! interaction controller until the user requests shutdown.

use anyhow::{Context, Result};
use camdeck::{
    controller::{ExitReason, InteractionController, Tuning},
    device::sim::{SimCamera, SimDisplay},
    device::{SharedCamera, SharedDisplay},
    gallery::PhotoStore,
    settings::SettingsStore,
    utils,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Default appliance data directory (photos, settings, logs)
const DEFAULT_DATA_DIR: &str = "/var/lib/camdeck";

fn main() -> Result<()> {
    let data_dir = data_dir();

    utils::init_logging(&data_dir.join("logs"))
        .context("Failed to initialize logging system")?;

    info!("camdeck v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", data_dir.display());

    // Simulated hardware; real drivers implement the same two traits
    let camera: SharedCamera = Arc::new(Mutex::new(SimCamera::new()));
    let display: SharedDisplay = Arc::new(Mutex::new(SimDisplay::new()));

    let photos = PhotoStore::new(data_dir.join("photos"))
        .context("Failed to open the photo directory")?;
    let settings_store = SettingsStore::new(data_dir.join("settings.json"));

    let controller = InteractionController::new(
        camera,
        display,
        photos,
        settings_store,
        Tuning::default(),
    );

    match controller.run() {
        ExitReason::Shutdown => {
            info!("Shutdown requested, powering off");
            power_off();
        }
        ExitReason::InputChannelClosed => {
            warn!("Input pipeline stopped unexpectedly, exiting without power-off");
        }
    }

    Ok(())
}

/// Data directory: first CLI argument, or the appliance default
fn data_dir() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
}

/// Ask the OS to power down. `CAMDECK_NO_POWEROFF` suppresses this for
/// bench and development runs.
fn power_off() {
    if std::env::var_os("CAMDECK_NO_POWEROFF").is_some() {
        info!("CAMDECK_NO_POWEROFF set, skipping poweroff");
        return;
    }
    if let Err(e) = std::process::Command::new("poweroff").status() {
        warn!("Failed to invoke poweroff: {}", e);
    }
}
