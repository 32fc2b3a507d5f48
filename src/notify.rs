//! Notification deduplication
//!
//! A single process-wide slot remembers the last warning that was shown. The same
//! warning arriving again within the dedupe window is dropped, so a panel polling a
//! dead server every second produces one toast instead of one per tick.

use crate::events::Event;
use log::trace;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Source of the current time, injected so dedupe windows can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct LastShown {
    message: String,
    shown_at: Instant,
}

pub struct Notifier {
    clock: Box<dyn Clock>,
    window: Duration,
    last: Mutex<Option<LastShown>>,
    sink: mpsc::Sender<Event>,
}

impl Notifier {
    pub fn new(clock: Box<dyn Clock>, window: Duration, sink: mpsc::Sender<Event>) -> Self {
        Self {
            clock,
            window,
            last: Mutex::new(None),
            sink,
        }
    }

    /// Shows a warning unless the same message was shown within the window.
    ///
    /// Returns whether the warning was shown.
    pub fn warn(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        let now = self.clock.now();
        {
            let Ok(mut last) = self.last.lock() else {
                return false;
            };
            if let Some(shown) = last.as_ref() {
                if shown.message == message && now.duration_since(shown.shown_at) < self.window {
                    trace!("Suppressed duplicate notification: {}", message);
                    return false;
                }
            }
            *last = Some(LastShown {
                message: message.clone(),
                shown_at: now,
            });
        }
        self.emit(Event::warning(message));
        true
    }

    /// Reports the outcome of a user action. Never deduplicated.
    pub fn success(&self, message: impl Into<String>) {
        self.emit(Event::success(message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Event::info(message));
    }

    fn emit(&self, event: Event) {
        // A full or closed sink drops the toast; notifications are best-effort.
        let _ = self.sink.try_send(event);
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: std::sync::Arc<Mutex<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: std::sync::Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;

    const WINDOW: Duration = Duration::from_secs(3);

    fn notifier() -> (Notifier, ManualClock, mpsc::Receiver<Event>) {
        let clock = ManualClock::new();
        let (sender, receiver) = mpsc::channel(16);
        let notifier = Notifier::new(Box::new(clock.clone()), WINDOW, sender);
        (notifier, clock, receiver)
    }

    fn drain(receiver: &mut mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_identical_messages_within_window_show_once() {
        let (notifier, clock, mut receiver) = notifier();

        assert!(notifier.warn("Could not reach the server"));
        clock.advance(Duration::from_secs(1));
        assert!(!notifier.warn("Could not reach the server"));
        clock.advance(Duration::from_millis(1500));
        assert!(!notifier.warn("Could not reach the server"));

        let events = drain(&mut receiver);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::Warning);
    }

    #[test]
    fn test_repeat_after_window_shows_again() {
        let (notifier, clock, mut receiver) = notifier();

        assert!(notifier.warn("Invalid upstream"));
        clock.advance(WINDOW);
        assert!(notifier.warn("Invalid upstream"));

        assert_eq!(drain(&mut receiver).len(), 2);
    }

    #[test]
    fn test_window_restarts_from_last_shown() {
        let (notifier, clock, _receiver) = notifier();

        assert!(notifier.warn("a"));
        clock.advance(WINDOW);
        assert!(notifier.warn("a"));
        clock.advance(WINDOW / 2);
        assert!(!notifier.warn("a"));
    }

    #[test]
    fn test_different_message_replaces_slot() {
        let (notifier, _clock, mut receiver) = notifier();

        assert!(notifier.warn("first"));
        assert!(notifier.warn("second"));
        // "first" is no longer in the slot, so it shows again.
        assert!(notifier.warn("first"));

        let messages: Vec<String> = drain(&mut receiver).into_iter().map(|e| e.msg).collect();
        assert_eq!(messages, vec!["first", "second", "first"]);
    }

    #[test]
    fn test_success_is_never_deduplicated() {
        let (notifier, _clock, mut receiver) = notifier();

        notifier.success("Upstream added");
        notifier.success("Upstream added");

        assert_eq!(drain(&mut receiver).len(), 2);
    }

    #[test]
    fn test_closed_sink_does_not_panic() {
        let (notifier, _clock, receiver) = notifier();
        drop(receiver);
        assert!(notifier.warn("nobody is listening"));
    }
}
