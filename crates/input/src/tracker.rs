//! Key tracker for terminal environments.
//!
//! Turns key press/repeat/release events into one [`InputFrame`] per tick.
//! Supports terminals that do not emit key release events by using a timeout:
//! a held control is dropped if no press or repeat refreshed it in time.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{map_key, Control};
use crate::types::{Horizontal, InputFrame, RotateIntent};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldKey {
    held: bool,
    /// Time since the last press or repeat.
    idle_ms: u32,
}

impl HeldKey {
    fn press(&mut self) -> bool {
        let fresh = !self.held;
        self.held = true;
        self.idle_ms = 0;
        fresh
    }

    fn release(&mut self) {
        self.held = false;
        self.idle_ms = 0;
    }

    fn age(&mut self, elapsed_ms: u32, timeout_ms: u32) {
        if !self.held {
            return;
        }
        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > timeout_ms {
            self.release();
        }
    }
}

/// Tracks held keys and latches edge-triggered controls between ticks.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    left: HeldKey,
    right: HeldKey,
    down: HeldKey,
    /// Most recently pressed horizontal direction.
    last_horizontal: Horizontal,
    hard_drop: bool,
    rotate: RotateIntent,
    hold: bool,
    restart: bool,
    key_release_timeout_ms: u32,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            left: HeldKey::default(),
            right: HeldKey::default(),
            down: HeldKey::default(),
            last_horizontal: Horizontal::None,
            hard_drop: false,
            rotate: RotateIntent::None,
            hold: false,
            restart: false,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Feed one key event. Returns the control it mapped to, if any.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Control> {
        let control = map_key(key)?;
        match key.kind {
            KeyEventKind::Press => self.press(control),
            KeyEventKind::Repeat => {
                // Auto-repeat only keeps held controls alive.
                if control.is_held() {
                    self.press(control);
                }
            }
            KeyEventKind::Release => self.release(control),
        }
        Some(control)
    }

    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => {
                if self.left.press() {
                    self.last_horizontal = Horizontal::Left;
                }
            }
            Control::Right => {
                if self.right.press() {
                    self.last_horizontal = Horizontal::Right;
                }
            }
            Control::SoftDrop => {
                self.down.press();
            }
            Control::HardDrop => self.hard_drop = true,
            Control::RotateCw => self.rotate = RotateIntent::Clockwise,
            Control::RotateCcw => self.rotate = RotateIntent::CounterClockwise,
            Control::Hold => self.hold = true,
            Control::Restart => self.restart = true,
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left => self.left.release(),
            Control::Right => self.right.release(),
            Control::SoftDrop => self.down.release(),
            _ => {}
        }
    }

    /// Sample the intents for one tick of `elapsed_ms` and clear the latched edges.
    pub fn tick(&mut self, elapsed_ms: u32) -> InputFrame {
        let timeout = self.key_release_timeout_ms;
        self.left.age(elapsed_ms, timeout);
        self.right.age(elapsed_ms, timeout);
        self.down.age(elapsed_ms, timeout);

        let frame = InputFrame {
            horizontal: self.horizontal(),
            soft_drop: self.down.held,
            hard_drop: self.hard_drop,
            rotate: self.rotate,
            hold: self.hold,
        };

        self.hard_drop = false;
        self.rotate = RotateIntent::None;
        self.hold = false;
        frame
    }

    /// The held horizontal direction; the latest press wins when both are held.
    pub fn horizontal(&self) -> Horizontal {
        match (self.left.held, self.right.held) {
            (true, true) => self.last_horizontal,
            (true, false) => Horizontal::Left,
            (false, true) => Horizontal::Right,
            (false, false) => Horizontal::None,
        }
    }

    /// Returns true once per restart request.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }

    pub fn reset(&mut self) {
        *self = Self::new().with_key_release_timeout_ms(self.key_release_timeout_ms);
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_held_until_release() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(10_000);
        tracker.handle_key_event(key(KeyCode::Left, KeyEventKind::Press));

        for _ in 0..20 {
            assert_eq!(tracker.tick(16).horizontal, Horizontal::Left);
        }

        tracker.handle_key_event(key(KeyCode::Left, KeyEventKind::Release));
        assert_eq!(tracker.tick(16).horizontal, Horizontal::None);
    }

    #[test]
    fn test_auto_release_after_timeout_without_release_events() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle_key_event(key(KeyCode::Down, KeyEventKind::Press));

        assert!(tracker.tick(30).soft_drop);
        assert!(tracker.tick(20).soft_drop);
        // 51ms without a refresh.
        assert!(!tracker.tick(1).soft_drop);
    }

    #[test]
    fn test_repeat_refreshes_held_key() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle_key_event(key(KeyCode::Right, KeyEventKind::Press));

        for _ in 0..10 {
            assert_eq!(tracker.tick(40).horizontal, Horizontal::Right);
            tracker.handle_key_event(key(KeyCode::Right, KeyEventKind::Repeat));
        }
    }

    #[test]
    fn test_non_movement_key_does_not_extend_timeout() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle_key_event(key(KeyCode::Left, KeyEventKind::Press));
        tracker.tick(40);

        tracker.handle_key_event(key(KeyCode::Up, KeyEventKind::Press));
        let frame = tracker.tick(20);
        assert_eq!(frame.horizontal, Horizontal::None);
        assert_eq!(frame.rotate, RotateIntent::Clockwise);
    }

    #[test]
    fn test_latest_horizontal_press_wins() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(10_000);
        tracker.press(Control::Left);
        tracker.press(Control::Right);
        assert_eq!(tracker.tick(16).horizontal, Horizontal::Right);

        tracker.release(Control::Right);
        assert_eq!(tracker.tick(16).horizontal, Horizontal::Left);
    }

    #[test]
    fn test_edges_fire_once() {
        let mut tracker = KeyTracker::new();
        tracker.handle_key_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        tracker.handle_key_event(key(KeyCode::Char('c'), KeyEventKind::Press));
        tracker.handle_key_event(key(KeyCode::Char('z'), KeyEventKind::Press));

        let frame = tracker.tick(16);
        assert!(frame.hard_drop);
        assert!(frame.hold);
        assert_eq!(frame.rotate, RotateIntent::CounterClockwise);

        assert_eq!(tracker.tick(16), InputFrame::IDLE);
    }

    #[test]
    fn test_repeat_does_not_refire_edges() {
        let mut tracker = KeyTracker::new();
        tracker.handle_key_event(key(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert!(!tracker.tick(16).hard_drop);
    }

    #[test]
    fn test_restart_is_taken_once() {
        let mut tracker = KeyTracker::new();
        assert_eq!(
            tracker.handle_key_event(key(KeyCode::Char('r'), KeyEventKind::Press)),
            Some(Control::Restart)
        );
        assert!(tracker.take_restart());
        assert!(!tracker.take_restart());
    }

    #[test]
    fn test_reset_clears_state_but_keeps_timeout() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(1234);
        tracker.press(Control::Left);
        tracker.press(Control::HardDrop);

        tracker.reset();
        assert_eq!(tracker.tick(16), InputFrame::IDLE);
        assert_eq!(tracker.key_release_timeout_ms(), 1234);
    }
}
