//! UI modes, shared state, and the state machine
//!
//! [`SharedUiState`] is the single aggregate touched by more than one
//! thread; everything that reads or writes it goes through one
//! `parking_lot::Mutex`. [`UiStateMachine`] consumes classified input
//! events, mutating the shared state and driving the camera and photo
//! store according to the mode transition table.

pub mod state;
pub mod state_machine;

pub use state::{Notice, SharedState, SharedUiState, UiMode};
pub use state_machine::UiStateMachine;
