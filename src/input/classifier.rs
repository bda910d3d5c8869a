//! Button event classification
//!
//! Pure, clock-explicit classification of button level samples into
//! discrete events. The poller owns the wall clock; everything here works
//! from the `now` it is handed, which keeps the timing contracts testable.

use std::time::{Duration, Instant};

/// One of the four physical buttons
///
/// Roles are fixed by physical position: A confirms, B switches modes,
/// X moves down/previous, Y moves up/next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Primary / confirm
    A,
    /// Secondary / mode
    B,
    /// Decrement / previous
    X,
    /// Increment / next
    Y,
}

impl ButtonId {
    /// All buttons in sampling order
    pub const ALL: [ButtonId; 4] = [ButtonId::A, ButtonId::B, ButtonId::X, ButtonId::Y];

    /// Index into per-button arrays
    pub fn index(self) -> usize {
        match self {
            ButtonId::A => 0,
            ButtonId::B => 1,
            ButtonId::X => 2,
            ButtonId::Y => 3,
        }
    }
}

/// One level sample per button, indexed by [`ButtonId::index`]
pub type Levels = [bool; 4];

/// Classified event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Falling-to-rising transition (button went down)
    Press,
    /// A completed single press (button went up, double-press window expired)
    Release,
    /// Second press of a pair inside the double-press window completed
    DoublePress,
    /// X and Y held together past the hold threshold
    HoldCombo {
        /// Time both buttons had been held when the combo fired
        held: Duration,
    },
}

/// A discrete input event
///
/// `HoldCombo` events are attributed to [`ButtonId::X`]; the combo pair is
/// fixed (X+Y) and consumers match on the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Button the event belongs to
    pub button: ButtonId,
    /// What happened
    pub kind: EventKind,
}

/// Timing configuration for classification
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Maximum gap between two presses to count as a double press
    pub double_press_window: Duration,
    /// How long X and Y must be held together before the combo fires
    pub hold_threshold: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            double_press_window: Duration::from_millis(400),
            hold_threshold: Duration::from_secs(2),
        }
    }
}

/// Per-button runtime state
#[derive(Debug, Default)]
struct ButtonState {
    /// Level seen at the previous sample
    is_down: bool,
    /// Instant of the current press edge
    pressed_at: Option<Instant>,
    /// Pairing anchor for double-press detection
    last_press: Option<Instant>,
    /// The current press is the second of a pair
    double_pending: bool,
    /// A fast release waiting out the double-press window
    deferred_release_at: Option<Instant>,
}

/// Turns level samples into events
///
/// Feed it one [`Levels`] sample per poll tick via [`EventClassifier::step`].
pub struct EventClassifier {
    config: ClassifierConfig,
    buttons: [ButtonState; 4],
    /// When X and Y first became simultaneously held
    combo_since: Option<Instant>,
    /// Combo fired and has not yet fully released
    combo_fired: bool,
}

impl EventClassifier {
    /// Create a classifier with the given timing configuration
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            buttons: Default::default(),
            combo_since: None,
            combo_fired: false,
        }
    }

    /// Process one level sample taken at `now`, returning any events it produced
    pub fn step(&mut self, now: Instant, levels: Levels) -> Vec<InputEvent> {
        let mut events = Vec::new();

        self.step_combo(now, levels, &mut events);

        for button in ButtonId::ALL {
            self.step_button(button, now, levels[button.index()], &mut events);
        }

        // Re-arm the combo only once both watched buttons are up. This runs
        // after edge processing so the releases that end a fired combo are
        // still seen as suppressed.
        let x_down = levels[ButtonId::X.index()];
        let y_down = levels[ButtonId::Y.index()];
        if !(x_down && y_down) {
            self.combo_since = None;
        }
        if !x_down && !y_down {
            self.combo_fired = false;
        }

        events
    }

    /// Hold-combo detection for X+Y. Takes priority over per-button
    /// classification: firing clears the pairing state of both buttons.
    fn step_combo(&mut self, now: Instant, levels: Levels, events: &mut Vec<InputEvent>) {
        let both_down = levels[ButtonId::X.index()] && levels[ButtonId::Y.index()];
        if !both_down {
            return;
        }

        let since = *self.combo_since.get_or_insert(now);
        if !self.combo_fired && now.duration_since(since) >= self.config.hold_threshold {
            self.combo_fired = true;
            for button in [ButtonId::X, ButtonId::Y] {
                let state = &mut self.buttons[button.index()];
                state.double_pending = false;
                state.deferred_release_at = None;
                state.last_press = None;
            }
            events.push(InputEvent {
                button: ButtonId::X,
                kind: EventKind::HoldCombo {
                    held: now.duration_since(since),
                },
            });
        }
    }

    /// Edge detection and press/release/double-press classification for one button
    fn step_button(
        &mut self,
        button: ButtonId,
        now: Instant,
        level: bool,
        events: &mut Vec<InputEvent>,
    ) {
        let window = self.config.double_press_window;
        let combo_fired = self.combo_fired;
        let combo_watched = matches!(button, ButtonId::X | ButtonId::Y);
        let state = &mut self.buttons[button.index()];

        if level && !state.is_down {
            // Press edge
            state.is_down = true;
            state.pressed_at = Some(now);
            match state.last_press {
                Some(prior) if now.duration_since(prior) < window => {
                    // Second press of a pair: cancel the deferred release of
                    // the first and reset the anchor so a third press does
                    // not re-pair.
                    state.double_pending = true;
                    state.deferred_release_at = None;
                    state.last_press = None;
                }
                _ => {
                    state.last_press = Some(now);
                    state.double_pending = false;
                }
            }
            events.push(InputEvent {
                button,
                kind: EventKind::Press,
            });
        } else if !level && state.is_down {
            // Release edge
            state.is_down = false;
            let pressed_at = state.pressed_at.take();

            if combo_fired && combo_watched {
                // The combo already consumed this hold
                state.double_pending = false;
                state.deferred_release_at = None;
            } else if state.double_pending {
                state.double_pending = false;
                events.push(InputEvent {
                    button,
                    kind: EventKind::DoublePress,
                });
            } else if let Some(t) = pressed_at
                && now.duration_since(t) < window
            {
                // Too early to rule out a double press; hold the Release
                // until the window expires.
                state.deferred_release_at = Some(t + window);
            } else {
                events.push(InputEvent {
                    button,
                    kind: EventKind::Release,
                });
            }
        }

        if !state.is_down
            && let Some(deadline) = state.deferred_release_at
            && now >= deadline
        {
            state.deferred_release_at = None;
            events.push(InputEvent {
                button,
                kind: EventKind::Release,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_millis(50);

    fn classifier() -> EventClassifier {
        EventClassifier::new(ClassifierConfig::default())
    }

    fn levels(a: bool, b: bool, x: bool, y: bool) -> Levels {
        [a, b, x, y]
    }

    /// Drive the classifier with a sequence of level samples at the poll
    /// cadence, collecting all events.
    fn run(classifier: &mut EventClassifier, samples: &[Levels]) -> Vec<InputEvent> {
        let start = Instant::now();
        let mut events = Vec::new();
        for (i, sample) in samples.iter().enumerate() {
            events.extend(classifier.step(start + POLL * i as u32, *sample));
        }
        events
    }

    fn kinds_for(events: &[InputEvent], button: ButtonId) -> Vec<EventKind> {
        events
            .iter()
            .filter(|e| e.button == button)
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn isolated_fast_press_yields_single_release() {
        let mut c = classifier();
        // Down for two samples (100ms), then idle past the window
        let mut samples = vec![levels(true, false, false, false); 2];
        samples.extend(vec![levels(false, false, false, false); 12]);

        let events = run(&mut c, &samples);
        let kinds = kinds_for(&events, ButtonId::A);
        assert_eq!(kinds, vec![EventKind::Press, EventKind::Release]);
    }

    #[test]
    fn release_is_deferred_until_window_expires() {
        let mut c = classifier();
        let start = Instant::now();

        let mut events = c.step(start, levels(true, false, false, false));
        events.extend(c.step(start + POLL, levels(false, false, false, false)));
        // Inside the window: only the Press so far
        assert_eq!(kinds_for(&events, ButtonId::A), vec![EventKind::Press]);

        // Window expired: the deferred Release arrives
        let late = c.step(start + Duration::from_millis(450), levels(false, false, false, false));
        assert_eq!(kinds_for(&late, ButtonId::A), vec![EventKind::Release]);
    }

    #[test]
    fn paired_presses_yield_one_double_press_and_no_release() {
        let mut c = classifier();
        let mut samples = Vec::new();
        samples.push(levels(false, true, false, false)); // press 1
        samples.push(levels(false, false, false, false)); // release 1 (fast)
        samples.push(levels(false, true, false, false)); // press 2, gap 100ms
        samples.push(levels(false, false, false, false)); // release 2
        samples.extend(vec![levels(false, false, false, false); 12]); // idle past window

        let events = run(&mut c, &samples);
        let kinds = kinds_for(&events, ButtonId::B);
        assert_eq!(
            kinds,
            vec![EventKind::Press, EventKind::Press, EventKind::DoublePress]
        );
    }

    #[test]
    fn third_press_starts_a_fresh_pair() {
        let mut c = classifier();
        let mut samples = Vec::new();
        // Double press
        samples.push(levels(true, false, false, false));
        samples.push(levels(false, false, false, false));
        samples.push(levels(true, false, false, false));
        samples.push(levels(false, false, false, false));
        // Third fast press right after: must not pair with the second
        samples.push(levels(true, false, false, false));
        samples.push(levels(false, false, false, false));
        samples.extend(vec![levels(false, false, false, false); 12]);

        let events = run(&mut c, &samples);
        let kinds = kinds_for(&events, ButtonId::A);
        let doubles = kinds
            .iter()
            .filter(|k| matches!(k, EventKind::DoublePress))
            .count();
        let releases = kinds
            .iter()
            .filter(|k| matches!(k, EventKind::Release))
            .count();
        assert_eq!(doubles, 1);
        assert_eq!(releases, 1);
    }

    #[test]
    fn slow_release_emits_immediately() {
        let mut c = classifier();
        // Held for 500ms, past the window
        let mut samples = vec![levels(false, false, true, false); 11];
        samples.push(levels(false, false, false, false));

        let events = run(&mut c, &samples);
        assert_eq!(
            kinds_for(&events, ButtonId::X),
            vec![EventKind::Press, EventKind::Release]
        );
    }

    #[test]
    fn hold_combo_fires_exactly_once() {
        let mut c = classifier();
        // Both held for 2.5s at 50ms cadence = 50 samples
        let samples = vec![levels(false, false, true, true); 50];

        let events = run(&mut c, &samples);
        let combos = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::HoldCombo { .. }))
            .count();
        assert_eq!(combos, 1);
    }

    #[test]
    fn combo_rearms_only_after_full_release() {
        let mut c = classifier();
        let mut samples = vec![levels(false, false, true, true); 50]; // fires
        // Release only Y, keep X held, press Y again and hold: no second fire
        samples.push(levels(false, false, true, false));
        samples.extend(vec![levels(false, false, true, true); 50]);
        // Full release, then a fresh hold: fires again
        samples.push(levels(false, false, false, false));
        samples.extend(vec![levels(false, false, true, true); 50]);

        let events = run(&mut c, &samples);
        let combos = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::HoldCombo { .. }))
            .count();
        assert_eq!(combos, 2);
    }

    #[test]
    fn combo_suppresses_trailing_releases() {
        let mut c = classifier();
        let mut samples = vec![levels(false, false, true, true); 50]; // fires
        samples.push(levels(false, false, false, false)); // both up
        samples.extend(vec![levels(false, false, false, false); 12]);

        let events = run(&mut c, &samples);
        let releases = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Release))
            .count();
        assert_eq!(releases, 0, "combo releases must not leak as navigation");
    }

    #[test]
    fn independent_button_does_not_block_combo() {
        let mut c = classifier();
        // A held throughout while X+Y accumulate
        let samples = vec![levels(true, false, true, true); 50];

        let events = run(&mut c, &samples);
        assert!(
            events
                .iter()
                .any(|e| matches!(e.kind, EventKind::HoldCombo { .. }))
        );
    }

    #[test]
    fn combo_held_duration_meets_threshold() {
        let mut c = classifier();
        let samples = vec![levels(false, false, true, true); 50];
        let events = run(&mut c, &samples);
        let held = events
            .iter()
            .find_map(|e| match e.kind {
                EventKind::HoldCombo { held } => Some(held),
                _ => None,
            })
            .expect("combo should fire");
        assert!(held >= Duration::from_secs(2));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: for any single-button level sequence, DoublePress
            /// count never exceeds half the press-edge count.
            #[test]
            fn doubles_never_exceed_press_pairs(seq in prop::collection::vec(any::<bool>(), 1..120)) {
                let mut c = classifier();
                let start = Instant::now();
                let mut presses = 0usize;
                let mut doubles = 0usize;
                for (i, down) in seq.iter().enumerate() {
                    for event in c.step(start + POLL * i as u32, [*down, false, false, false]) {
                        match event.kind {
                            EventKind::Press => presses += 1,
                            EventKind::DoublePress => doubles += 1,
                            _ => {}
                        }
                    }
                }
                prop_assert!(doubles * 2 <= presses);
            }

            /// Property: total terminal events (Release + DoublePress) never
            /// exceed press edges; a press produces at most one terminal event.
            #[test]
            fn terminals_never_exceed_presses(seq in prop::collection::vec(any::<bool>(), 1..120)) {
                let mut c = classifier();
                let start = Instant::now();
                let mut presses = 0usize;
                let mut terminals = 0usize;
                for (i, down) in seq.iter().enumerate() {
                    for event in c.step(start + POLL * i as u32, [false, *down, false, false]) {
                        match event.kind {
                            EventKind::Press => presses += 1,
                            EventKind::Release | EventKind::DoublePress => terminals += 1,
                            _ => {}
                        }
                    }
                }
                // Drain any deferred release
                let drain = c.step(start + POLL * (seq.len() as u32 + 20), [false, false, false, false]);
                terminals += drain
                    .iter()
                    .filter(|e| matches!(e.kind, EventKind::Release | EventKind::DoublePress))
                    .count();
                prop_assert!(terminals <= presses);
            }
        }
    }
}
