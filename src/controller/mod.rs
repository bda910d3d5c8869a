//! Interaction controller
//!
//! Composition root for the runtime: wires the button poller, the event
//! dispatch loop, and the preview scheduler around one shared state.

mod interaction_controller;

pub use interaction_controller::{ExitReason, InteractionController, Tuning};
