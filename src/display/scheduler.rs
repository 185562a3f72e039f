/*
 *  display/scheduler.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rotation scheduler - tracks the current slot, advances on manual or
 *  timed triggers and owns the auto-advance timer lifecycle
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::Duration;

use log::{debug, info, warn};

use super::timer::{TickToken, TimerHost};
use crate::messages::StoreError;

/// Observable scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing rendered yet
    Idle,
    /// A slot is on screen, no timer running
    ShowingSlot(usize),
    /// A slot is on screen and the timer advances it
    AutoAdvancing { slot: usize, interval_secs: u32 },
}

/// Rotation state machine
///
/// Holds no text and does no I/O: blankness is asked of the caller and
/// the caller renders whatever slot the scheduler lands on.
#[derive(Debug)]
pub struct RotationScheduler {
    slot_count: usize,
    current: usize,
    shown: bool,
    auto_advance: bool,
    interval_secs: u32,
    generation: u64,
    test_pattern: bool,
}

impl RotationScheduler {
    /// Create a scheduler for `slot_count` slots, starting idle on slot 0
    pub fn new(slot_count: usize, interval_secs: u32) -> Self {
        Self {
            slot_count: slot_count.max(1),
            current: 0,
            shown: false,
            auto_advance: false,
            interval_secs,
            generation: 0,
            test_pattern: false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.auto_advance {
            SchedulerState::AutoAdvancing {
                slot: self.current,
                interval_secs: self.interval_secs,
            }
        } else if self.shown {
            SchedulerState::ShowingSlot(self.current)
        } else {
            SchedulerState::Idle
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advance
    }

    /// Interval used by the last (or next) arming of the timer
    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    /// Change the interval used from the next arming or tick on.
    ///
    /// Zero is refused: auto-advance stops and the old interval is kept.
    /// Returns whether the new interval was taken.
    pub fn set_interval_secs(&mut self, interval_secs: u32) -> bool {
        if interval_secs == 0 {
            warn!("Auto-advance interval must be at least 1 second; auto-advance stopped");
            self.disable_auto();
            return false;
        }
        self.interval_secs = interval_secs;
        true
    }

    pub fn is_showing_test_pattern(&self) -> bool {
        self.test_pattern
    }

    /// Make `slot` current
    pub fn select(&mut self, slot: usize) -> Result<usize, StoreError> {
        if slot >= self.slot_count {
            return Err(StoreError::SlotOutOfRange {
                slot,
                slots: self.slot_count,
            });
        }
        Ok(self.show(slot))
    }

    fn show(&mut self, slot: usize) -> usize {
        self.current = slot;
        self.shown = true;
        self.test_pattern = false;
        slot
    }

    /// First non-blank slot after the current one, scanning at most one
    /// full cycle. If every other slot is blank the scan ends back on the
    /// current slot.
    pub fn next_slot<F>(&self, is_blank: F) -> usize
    where
        F: Fn(usize) -> bool,
    {
        (1..=self.slot_count)
            .map(|step| (self.current + step) % self.slot_count)
            .find(|&slot| !is_blank(slot))
            .unwrap_or(self.current)
    }

    /// Move to the next non-blank slot and return it
    pub fn advance<F>(&mut self, is_blank: F) -> usize
    where
        F: Fn(usize) -> bool,
    {
        let next = self.next_slot(is_blank);
        if next != self.current {
            debug!("Advance: slot {} -> {}", self.current, next);
        }
        // next_slot only yields indices below slot_count
        self.show(next)
    }

    /// Arm the recurring auto-advance tick.
    ///
    /// A zero interval arms nothing and leaves auto-advance off. Arming
    /// again while already running replaces the previous timer: its
    /// outstanding tick carries an old generation and will be dropped.
    pub fn enable_auto<H: TimerHost>(&mut self, interval_secs: u32, timer: &mut H) -> bool {
        if interval_secs == 0 {
            warn!("Auto-advance interval must be at least 1 second; not armed");
            self.auto_advance = false;
            return false;
        }

        self.generation += 1;
        self.interval_secs = interval_secs;
        self.auto_advance = true;
        self.shown = true;
        self.test_pattern = false;

        timer.schedule(self.period(), self.token());
        info!("Auto-advance every {}s", interval_secs);
        true
    }

    /// Stop auto-advance. Any tick already scheduled becomes a no-op.
    pub fn disable_auto(&mut self) {
        if self.auto_advance {
            info!("Auto-advance off");
        }
        self.auto_advance = false;
    }

    /// Handle a timer tick.
    ///
    /// Returns the slot advanced to, after re-arming the timer, or `None`
    /// when the tick is stale (auto-advance off or re-armed since); a
    /// stale tick is not re-armed. A zero period is never re-armed.
    pub fn tick<F, H>(&mut self, token: TickToken, is_blank: F, timer: &mut H) -> Option<usize>
    where
        F: Fn(usize) -> bool,
        H: TimerHost,
    {
        if !self.auto_advance || token.generation != self.generation {
            debug!("Dropping stale tick {:?}", token);
            return None;
        }

        let slot = self.advance(is_blank);
        if self.interval_secs == 0 {
            warn!("Zero auto-advance period; not re-armed");
            self.auto_advance = false;
        } else {
            timer.schedule(self.period(), self.token());
        }
        Some(slot)
    }

    /// Lamp test takes over the screen: auto-advance stops, the current
    /// slot is kept for the next select or advance.
    pub fn enter_test_pattern(&mut self) {
        self.disable_auto();
        self.test_pattern = true;
    }

    fn period(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }

    fn token(&self) -> TickToken {
        TickToken { generation: self.generation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::timer::ManualTimer;

    fn blanks(pattern: &'static [bool]) -> impl Fn(usize) -> bool {
        move |slot| pattern[slot]
    }

    #[test]
    fn test_initial_state_is_idle() {
        let sched = RotationScheduler::new(6, 5);
        assert_eq!(sched.state(), SchedulerState::Idle);
        assert_eq!(sched.current(), 0);
        assert!(!sched.is_auto_advancing());
    }

    #[test]
    fn test_advance_skips_blank_slots() {
        let mut sched = RotationScheduler::new(3, 5);
        sched.select(0).unwrap();
        assert_eq!(sched.advance(blanks(&[false, true, false])), 2);
        assert_eq!(sched.state(), SchedulerState::ShowingSlot(2));
        // wraps
        assert_eq!(sched.advance(blanks(&[false, true, false])), 0);
    }

    #[test]
    fn test_advance_all_blank_returns_to_start() {
        let mut sched = RotationScheduler::new(3, 5);
        sched.select(1).unwrap();
        assert_eq!(sched.advance(blanks(&[true, true, true])), 1);
    }

    #[test]
    fn test_advance_only_current_non_blank() {
        let mut sched = RotationScheduler::new(4, 5);
        sched.select(2).unwrap();
        assert_eq!(sched.advance(blanks(&[true, true, false, true])), 2);
    }

    #[test]
    fn test_advance_scan_is_bounded() {
        use std::cell::Cell;
        let calls = Cell::new(0);
        let mut sched = RotationScheduler::new(6, 5);
        sched.advance(|_| {
            calls.set(calls.get() + 1);
            true
        });
        assert_eq!(calls.get(), 6);
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let mut sched = RotationScheduler::new(6, 5);
        sched.select(3).unwrap();

        assert_eq!(
            sched.select(7),
            Err(StoreError::SlotOutOfRange { slot: 7, slots: 6 })
        );
        assert_eq!(sched.select(6), Err(StoreError::SlotOutOfRange { slot: 6, slots: 6 }));
        assert_eq!(sched.current(), 3);
        assert_eq!(sched.state(), SchedulerState::ShowingSlot(3));
    }

    #[test]
    fn test_zero_interval_while_running_stops_rotation() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.select(0).unwrap();
        sched.enable_auto(5, &mut timer);

        assert!(!sched.set_interval_secs(0));
        assert_eq!(sched.interval_secs(), 5);
        assert!(!sched.is_auto_advancing());

        let token = timer.fire_next().unwrap();
        assert_eq!(sched.tick(token, blanks(&[false, false, false]), &mut timer), None);
        assert!(timer.pending().is_empty());
        assert_eq!(sched.current(), 0);
    }

    #[test]
    fn test_new_interval_applies_from_next_tick() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.enable_auto(5, &mut timer);

        assert!(sched.set_interval_secs(9));
        let token = timer.fire_next().unwrap();
        assert_eq!(sched.tick(token, blanks(&[false, false, false]), &mut timer), Some(1));
        assert_eq!(timer.pending()[0].0, Duration::from_secs(9));
    }

    #[test]
    fn test_zero_interval_never_rearms_from_tick() {
        let mut sched = RotationScheduler::new(3, 0);
        let mut timer = ManualTimer::new();
        sched.auto_advance = true;

        let token = sched.token();
        assert_eq!(sched.tick(token, blanks(&[false, false, false]), &mut timer), Some(1));
        assert_eq!(timer.total_scheduled(), 0);
        assert!(!sched.is_auto_advancing());
    }

    #[test]
    fn test_zero_interval_is_not_armed() {
        let mut sched = RotationScheduler::new(6, 5);
        let mut timer = ManualTimer::new();
        sched.select(0).unwrap();

        assert!(!sched.enable_auto(0, &mut timer));
        assert!(!sched.is_auto_advancing());
        assert_eq!(timer.total_scheduled(), 0);
        assert_eq!(sched.state(), SchedulerState::ShowingSlot(0));
    }

    #[test]
    fn test_tick_advances_and_rearms() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.select(0).unwrap();
        sched.enable_auto(5, &mut timer);
        assert_eq!(
            sched.state(),
            SchedulerState::AutoAdvancing { slot: 0, interval_secs: 5 }
        );
        assert_eq!(timer.pending()[0].0, Duration::from_secs(5));

        let token = timer.fire_next().unwrap();
        assert_eq!(sched.tick(token, blanks(&[false, false, false]), &mut timer), Some(1));
        assert_eq!(timer.pending().len(), 1);
        assert_eq!(timer.total_scheduled(), 2);
    }

    #[test]
    fn test_tick_after_disable_is_noop_and_not_rearmed() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.select(0).unwrap();
        sched.enable_auto(5, &mut timer);

        let in_flight = timer.fire_next().unwrap();
        sched.disable_auto();

        assert_eq!(sched.tick(in_flight, blanks(&[false, false, false]), &mut timer), None);
        assert_eq!(sched.current(), 0);
        assert!(timer.pending().is_empty());
        assert_eq!(sched.state(), SchedulerState::ShowingSlot(0));
    }

    #[test]
    fn test_rearm_drops_old_generation() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.enable_auto(5, &mut timer);
        sched.disable_auto();
        sched.enable_auto(7, &mut timer);

        let old = timer.fire_next().unwrap();
        let new = timer.fire_next().unwrap();
        assert_eq!(sched.tick(old, blanks(&[false, false, false]), &mut timer), None);
        assert!(timer.pending().is_empty());
        assert_eq!(sched.tick(new, blanks(&[false, false, false]), &mut timer), Some(1));
        assert_eq!(timer.pending()[0].0, Duration::from_secs(7));
    }

    #[test]
    fn test_test_pattern_stops_auto_and_keeps_current() {
        let mut sched = RotationScheduler::new(3, 5);
        let mut timer = ManualTimer::new();
        sched.select(2).unwrap();
        sched.enable_auto(5, &mut timer);

        sched.enter_test_pattern();
        assert!(!sched.is_auto_advancing());
        assert!(sched.is_showing_test_pattern());
        assert_eq!(sched.current(), 2);

        let token = timer.fire_next().unwrap();
        assert_eq!(sched.tick(token, blanks(&[false, false, false]), &mut timer), None);
        assert_eq!(sched.current(), 2);

        sched.select(sched.current()).unwrap();
        assert!(!sched.is_showing_test_pattern());
    }
}
