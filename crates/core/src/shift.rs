//! DAS/ARR auto-shift timers.
//!
//! One [`AutoShift`] drives one held input channel (horizontal movement or
//! soft drop). It is a small state machine:
//!
//! - **Idle**: nothing held, or re-armed after a lock.
//! - **Charging**: a fresh press moved once immediately; the DAS timer runs.
//! - **Repeating**: DAS elapsed; one move per ARR interval while held.
//!
//! Releasing, or switching to a different direction, restarts from a fresh press.

use stackfall_types::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShiftPhase {
    #[default]
    Idle,
    Charging,
    Repeating,
}

#[derive(Debug, Clone)]
pub struct AutoShift {
    das_ms: u32,
    arr_ms: u32,
    phase: ShiftPhase,
    direction: Option<Point>,
    das_timer_ms: u32,
    arr_accumulator_ms: u32,
}

impl AutoShift {
    pub fn new(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            das_ms,
            arr_ms,
            phase: ShiftPhase::Idle,
            direction: None,
            das_timer_ms: 0,
            arr_accumulator_ms: 0,
        }
    }

    pub fn phase(&self) -> ShiftPhase {
        self.phase
    }

    /// Direction currently latched (None when idle).
    pub fn direction(&self) -> Option<Point> {
        self.direction
    }

    /// Advance by one tick with `held` as the currently held direction.
    ///
    /// `try_step` performs one move and reports whether it happened.
    /// Returns the number of successful moves this tick.
    pub fn update(
        &mut self,
        held: Option<Point>,
        elapsed_ms: u32,
        mut try_step: impl FnMut(Point) -> bool,
    ) -> u32 {
        let Some(direction) = held else {
            self.rearm();
            return 0;
        };

        if self.phase == ShiftPhase::Idle || self.direction != Some(direction) {
            self.direction = Some(direction);
            self.phase = ShiftPhase::Charging;
            self.das_timer_ms = 0;
            self.arr_accumulator_ms = 0;
            return u32::from(try_step(direction));
        }

        match self.phase {
            ShiftPhase::Charging => {
                self.das_timer_ms = self.das_timer_ms.saturating_add(elapsed_ms);
                if self.das_timer_ms < self.das_ms {
                    return 0;
                }

                // The tick that completes DAS moves once, carrying the excess into ARR.
                self.phase = ShiftPhase::Repeating;
                self.arr_accumulator_ms = self.das_timer_ms - self.das_ms;
                if !try_step(direction) {
                    self.arr_accumulator_ms = self.arr_ms;
                    return 0;
                }
                1 + self.repeat(direction, &mut try_step)
            }
            ShiftPhase::Repeating => {
                self.arr_accumulator_ms = self.arr_accumulator_ms.saturating_add(elapsed_ms);
                self.repeat(direction, &mut try_step)
            }
            ShiftPhase::Idle => 0,
        }
    }

    fn repeat(&mut self, direction: Point, try_step: &mut impl FnMut(Point) -> bool) -> u32 {
        let mut moves = 0;

        if self.arr_ms == 0 {
            while try_step(direction) {
                moves += 1;
            }
            self.arr_accumulator_ms = 0;
            return moves;
        }

        while self.arr_accumulator_ms >= self.arr_ms {
            if !try_step(direction) {
                // Stay primed so the next tick retries immediately.
                self.arr_accumulator_ms = self.arr_ms;
                break;
            }
            self.arr_accumulator_ms -= self.arr_ms;
            moves += 1;
        }
        moves
    }

    /// Forget the latched direction. A direction still held on the next
    /// update counts as a fresh press.
    pub fn rearm(&mut self) {
        self.phase = ShiftPhase::Idle;
        self.direction = None;
        self.das_timer_ms = 0;
        self.arr_accumulator_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Holds `direction` for `ticks` ticks of `tick_ms` after an initial
    /// zero-length press tick, returning the clock times at which moves happened.
    fn move_times(shift: &mut AutoShift, tick_ms: u32, ticks: u32) -> Vec<u32> {
        let mut times = Vec::new();
        let mut now = 0;
        if shift.update(Some(Point::LEFT), 0, |_| true) > 0 {
            times.push(now);
        }
        for _ in 0..ticks {
            now += tick_ms;
            let moved = shift.update(Some(Point::LEFT), tick_ms, |_| true);
            for _ in 0..moved {
                times.push(now);
            }
        }
        times
    }

    #[test]
    fn test_das_then_arr_with_millisecond_ticks() {
        let mut shift = AutoShift::new(183, 33);
        let times = move_times(&mut shift, 1, 260);
        assert_eq!(times, vec![0, 183, 216, 249]);
    }

    #[test]
    fn test_large_tick_emits_multiple_repeats() {
        let mut shift = AutoShift::new(100, 25);
        assert_eq!(shift.update(Some(Point::RIGHT), 0, |_| true), 1);
        // 100ms completes DAS (one move), then 50ms of excess is two ARR intervals.
        assert_eq!(shift.update(Some(Point::RIGHT), 150, |_| true), 3);
        assert_eq!(shift.phase(), ShiftPhase::Repeating);
    }

    #[test]
    fn test_release_resets_to_idle() {
        let mut shift = AutoShift::new(100, 25);
        shift.update(Some(Point::LEFT), 0, |_| true);
        shift.update(Some(Point::LEFT), 150, |_| true);
        assert_eq!(shift.update(None, 16, |_| true), 0);
        assert_eq!(shift.phase(), ShiftPhase::Idle);
        assert_eq!(shift.direction(), None);

        // Pressing again moves immediately.
        assert_eq!(shift.update(Some(Point::LEFT), 16, |_| true), 1);
        assert_eq!(shift.phase(), ShiftPhase::Charging);
    }

    #[test]
    fn test_direction_switch_restarts_das() {
        let mut shift = AutoShift::new(100, 25);
        shift.update(Some(Point::LEFT), 0, |_| true);
        shift.update(Some(Point::LEFT), 90, |_| true);

        assert_eq!(shift.update(Some(Point::RIGHT), 16, |_| true), 1);
        assert_eq!(shift.direction(), Some(Point::RIGHT));
        // The DAS timer restarted, so 90ms more is still not enough.
        assert_eq!(shift.update(Some(Point::RIGHT), 90, |_| true), 0);
    }

    #[test]
    fn test_blocked_repeat_retries_next_tick() {
        let mut shift = AutoShift::new(50, 20);
        shift.update(Some(Point::LEFT), 0, |_| true);
        shift.update(Some(Point::LEFT), 50, |_| true);

        assert_eq!(shift.update(Some(Point::LEFT), 40, |_| false), 0);
        // One tick later the wall is gone: the primed accumulator fires at once.
        assert_eq!(shift.update(Some(Point::LEFT), 1, |_| true), 1);
    }

    #[test]
    fn test_zero_arr_moves_until_blocked() {
        let mut shift = AutoShift::new(10, 0);
        shift.update(Some(Point::LEFT), 0, |_| true);
        let mut budget = 4;
        let moved = shift.update(Some(Point::LEFT), 10, |_| {
            if budget == 0 {
                return false;
            }
            budget -= 1;
            true
        });
        assert_eq!(moved, 4);
    }

    #[test]
    fn test_rearm_turns_held_direction_into_fresh_press() {
        let mut shift = AutoShift::new(100, 25);
        shift.update(Some(Point::DOWN), 0, |_| true);
        shift.update(Some(Point::DOWN), 200, |_| true);
        shift.rearm();
        assert_eq!(shift.update(Some(Point::DOWN), 16, |_| true), 1);
        assert_eq!(shift.phase(), ShiftPhase::Charging);
    }
}
