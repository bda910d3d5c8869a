//! Input event processing
//!
//! Turns raw button-line samples into discrete input events. The work is
//! split in two:
//!
//! - [`EventClassifier`]: a pure state machine that takes explicit sample
//!   instants and level sets and returns events. All timing contracts
//!   (double-press window, hold threshold, deferred releases) live here, so
//!   they can be unit-tested with synthetic clocks.
//! - [`ButtonPoller`]: a background thread that samples the display's
//!   button lines at a fixed cadence, feeds the classifier, and sends the
//!   resulting events over a bounded channel to the controller.
//!
//! # Classification rules
//!
//! - A press edge always emits [`EventKind::Press`].
//! - A release faster than the double-press window is deferred: it becomes
//!   a [`EventKind::Release`] only once the window expires with no second
//!   press. A second press inside the window cancels it, and the release of
//!   that second press emits exactly one [`EventKind::DoublePress`].
//! - Holding X and Y together past the hold threshold emits exactly one
//!   [`EventKind::HoldCombo`]; the combo re-arms only after both buttons
//!   are fully released, and the subsequent Release of each held button is
//!   suppressed so the destructive action arrives alone.
//!
//! Debounce comes from the sampling cadence itself: a transition is only
//! recognized between two consecutive samples, so the poll interval is the
//! effective debounce floor.

pub mod classifier;
pub mod poller;

pub use classifier::{ButtonId, ClassifierConfig, EventClassifier, EventKind, InputEvent, Levels};
pub use poller::ButtonPoller;
