//! Button polling thread
//!
//! Samples the four button lines at a fixed cadence and feeds the
//! [`EventClassifier`], sending classified events to the controller over a
//! bounded channel. A read failure on a line keeps that button's last known
//! level for the cycle: fail-safe, no spurious edge.

use crate::device::SharedDisplay;
use crate::input::classifier::{ButtonId, EventClassifier, InputEvent, Levels};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Background poller for the button lines
pub struct ButtonPoller {
    display: SharedDisplay,
    classifier: EventClassifier,
    event_sender: mpsc::SyncSender<InputEvent>,
    interval: Duration,
    running: Arc<AtomicBool>,
    last_levels: Levels,
}

impl ButtonPoller {
    /// Create a poller sampling `display` every `interval`
    pub fn new(
        display: SharedDisplay,
        classifier: EventClassifier,
        event_sender: mpsc::SyncSender<InputEvent>,
        interval: Duration,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            display,
            classifier,
            event_sender,
            interval,
            running,
            last_levels: [false; 4],
        }
    }

    /// Start the polling thread
    pub fn start(mut self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("button-poller".into())
            .spawn(move || {
                debug!("Button poller started ({}ms cadence)", self.interval.as_millis());
                while self.running.load(Ordering::SeqCst) {
                    self.poll_once(Instant::now());
                    thread::sleep(self.interval);
                }
                debug!("Button poller stopped");
            })
            .expect("failed to spawn button poller thread")
    }

    /// Take one sample of all four lines and dispatch any resulting events
    fn poll_once(&mut self, now: Instant) {
        let mut levels = self.last_levels;
        {
            let mut display = self.display.lock();
            for button in ButtonId::ALL {
                match display.read_button(button) {
                    Ok(level) => levels[button.index()] = level,
                    Err(e) => {
                        // Fail-safe: keep the previous level so a flaky line
                        // cannot fabricate an edge.
                        warn!("Button {:?} read failed, holding last level: {}", button, e);
                    }
                }
            }
        }
        self.last_levels = levels;

        for event in self.classifier.step(now, levels) {
            if let Err(e) = self.event_sender.send(event) {
                warn!("Event channel closed, dropping {:?}: {}", event, e);
                self.running.store(false, Ordering::SeqCst);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::SimDisplay;
    use crate::input::classifier::{ClassifierConfig, EventKind};
    use parking_lot::Mutex;

    #[test]
    fn poll_once_emits_press_on_scripted_level() {
        let display = Arc::new(Mutex::new(SimDisplay::new()));
        display.lock().set_button(ButtonId::A, true);

        let (tx, rx) = mpsc::sync_channel(32);
        let mut poller = ButtonPoller::new(
            display.clone(),
            EventClassifier::new(ClassifierConfig::default()),
            tx,
            Duration::from_millis(50),
            Arc::new(AtomicBool::new(true)),
        );

        poller.poll_once(Instant::now());

        let event = rx.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(event.button, ButtonId::A);
        assert_eq!(event.kind, EventKind::Press);
    }

    #[test]
    fn read_failure_holds_last_level() {
        let display = Arc::new(Mutex::new(SimDisplay::new()));
        display.lock().set_button(ButtonId::B, true);

        let (tx, rx) = mpsc::sync_channel(32);
        let mut poller = ButtonPoller::new(
            display.clone(),
            EventClassifier::new(ClassifierConfig::default()),
            tx,
            Duration::from_millis(50),
            Arc::new(AtomicBool::new(true)),
        );

        let start = Instant::now();
        poller.poll_once(start);
        let _press = rx.recv_timeout(Duration::from_millis(100)).unwrap();

        // Line goes bad while the button is physically released: the poller
        // must not see a release edge.
        display.lock().set_button(ButtonId::B, false);
        display.lock().fail_button_reads(true);
        poller.poll_once(start + Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "no event while the line is unreadable");

        // Line recovers: the release edge is recognized now
        display.lock().fail_button_reads(false);
        poller.poll_once(start + Duration::from_millis(600));
        let event = rx.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(event.kind, EventKind::Release);
    }
}
