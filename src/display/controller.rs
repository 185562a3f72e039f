/*
 *  display/controller.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display controller - single owner of the link, the message store and
 *  the rotation state; everything the presentation surface may call
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

use log::{info, warn};

use crate::constants::{
    DEFAULT_ACTIVE_LINES, DEFAULT_CHARSET, DEFAULT_INTERVAL_SECS, DEFAULT_SLOTS, DISPLAY_COLUMNS,
};
use crate::display::error::{ControllerError, TransportError};
use crate::display::protocol::DisplayProtocol;
use crate::display::scheduler::{RotationScheduler, SchedulerState};
use crate::display::timer::{TickToken, TimerHost};
use crate::display::traits::Transport;
use crate::messages::MessageStore;
use crate::presets::find_preset;

/// Configuration for the display controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Number of message slots
    pub slots: usize,

    /// Rows the display actually shows (2 for BA63, 4 for BA66)
    pub active_lines: usize,

    /// Auto-advance interval used when none is given
    pub interval_secs: u32,

    /// National character set selected at start-up
    pub charset: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            active_lines: DEFAULT_ACTIVE_LINES,
            interval_secs: DEFAULT_INTERVAL_SECS,
            charset: DEFAULT_CHARSET,
        }
    }
}

/// Owns all display state for one running instance
///
/// Every operation runs to completion on the caller's thread. Render
/// failures are logged and returned, but slot bookkeeping is updated
/// first so it always follows what the user asked for.
pub struct DisplayController<T: Transport, H: TimerHost> {
    protocol: DisplayProtocol<T>,
    store: MessageStore,
    scheduler: RotationScheduler,
    timer: H,
    charset: u8,
}

impl<T: Transport, H: TimerHost> DisplayController<T, H> {
    pub fn new(transport: T, timer: H, config: &ControllerConfig) -> Self {
        let store = MessageStore::new(config.slots, config.active_lines);
        let scheduler = RotationScheduler::new(store.slot_count(), config.interval_secs);
        Self {
            protocol: DisplayProtocol::new(transport),
            store,
            scheduler,
            timer,
            charset: config.charset,
        }
    }

    /// Power-on sequence: home, clear, select the character set
    pub fn start(&mut self) -> Result<(), ControllerError> {
        self.protocol.home()?;
        self.protocol.clear()?;
        self.protocol.set_character_set(self.charset)?;
        info!("Display ready on {} (charset {})", self.protocol.transport().name(), self.charset);
        Ok(())
    }

    /// Stop rotating and blank the display
    pub fn shutdown(&mut self) -> Result<(), ControllerError> {
        self.stop_auto();
        self.protocol.clear()?;
        Ok(())
    }

    fn stop_auto(&mut self) {
        self.scheduler.disable_auto();
        self.timer.cancel();
    }

    fn render_current(&mut self, op: &str) -> Result<(), ControllerError> {
        let slot = self.scheduler.current();
        let lines = self.store.get_lines(slot)?;
        self.protocol.render_slot(&lines).map_err(|e| report(op, e))
    }

    /// Show slot `slot` and make it current
    pub fn select_slot(&mut self, slot: usize) -> Result<(), ControllerError> {
        self.scheduler.select(slot)?;
        info!("Showing slot {}", slot);
        self.render_current("select")
    }

    /// Show the next non-blank slot (or the current one if all are blank)
    pub fn advance(&mut self) -> Result<(), ControllerError> {
        let store = &self.store;
        let slot = self.scheduler.advance(|s| store.is_blank(s).unwrap_or(true));
        info!("Advanced to slot {}", slot);
        self.render_current("advance")
    }

    /// Turn auto-advance on or off.
    ///
    /// Turning it on re-renders the current slot first, which also clears
    /// a lamp test left on screen. A render failure does not stop the
    /// timer being armed.
    pub fn set_auto_advance(&mut self, enabled: bool, interval_secs: u32) -> Result<(), ControllerError> {
        if !enabled {
            self.stop_auto();
            return Ok(());
        }

        let rendered = self.render_current("auto-advance");
        if !self.scheduler.enable_auto(interval_secs, &mut self.timer) {
            self.timer.cancel();
        }
        rendered
    }

    /// Set the interval used by `enable_auto_advance` and by later ticks.
    ///
    /// Zero is refused and stops auto-advance; returns whether the
    /// interval was taken.
    pub fn set_interval(&mut self, interval_secs: u32) -> bool {
        let accepted = self.scheduler.set_interval_secs(interval_secs);
        if !accepted {
            self.timer.cancel();
        }
        accepted
    }

    /// Turn auto-advance on with the configured interval
    pub fn enable_auto_advance(&mut self) -> Result<(), ControllerError> {
        let interval = self.scheduler.interval_secs();
        self.set_auto_advance(true, interval)
    }

    /// Handle an auto-advance tick delivered by the timer host
    ///
    /// Returns the slot now shown, or `None` for a stale tick.
    pub fn on_tick(&mut self, token: TickToken) -> Option<usize> {
        let store = &self.store;
        let slot = self
            .scheduler
            .tick(token, |s| store.is_blank(s).unwrap_or(true), &mut self.timer)?;

        // already logged; the next tick tries the link again
        let _ = self.render_current("tick");
        Some(slot)
    }

    /// Light every pixel. Auto-advance stops; the current slot is kept.
    pub fn trigger_test_pattern(&mut self) -> Result<(), ControllerError> {
        self.scheduler.enter_test_pattern();
        self.timer.cancel();
        info!("Lamp test");
        self.protocol
            .render_test_pattern(DISPLAY_COLUMNS)
            .map_err(|e| report("lamp test", e))
    }

    /// Change one line of one slot. The display is not refreshed.
    pub fn edit_line(&mut self, slot: usize, line: usize, text: &str) -> Result<(), ControllerError> {
        self.store.set_line(slot, line, text)?;
        Ok(())
    }

    /// Replace all slot contents with a named preset
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ControllerError> {
        let preset = find_preset(name).ok_or_else(|| ControllerError::UnknownPreset(name.to_string()))?;
        self.store.apply_preset(preset);
        info!("Loaded preset {}", preset.name);
        Ok(())
    }

    pub fn current_slot(&self) -> usize {
        self.scheduler.current()
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.scheduler.is_auto_advancing()
    }

    pub fn interval_secs(&self) -> u32 {
        self.scheduler.interval_secs()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn is_showing_test_pattern(&self) -> bool {
        self.scheduler.is_showing_test_pattern()
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn transport(&self) -> &T {
        self.protocol.transport()
    }

    pub fn timer(&self) -> &H {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut H {
        &mut self.timer
    }
}

fn report(op: &str, err: TransportError) -> ControllerError {
    warn!("Display write failed during {}: {}", op, err);
    ControllerError::Render(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockTransport;
    use crate::display::timer::ManualTimer;
    use crate::messages::StoreError;

    fn controller(slots: usize) -> (DisplayController<MockTransport, ManualTimer>, MockTransport) {
        let link = MockTransport::new();
        let config = ControllerConfig { slots, ..Default::default() };
        (DisplayController::new(link.clone(), ManualTimer::new(), &config), link)
    }

    #[test]
    fn test_start_sequence() {
        let (mut ctl, link) = controller(6);
        ctl.start().unwrap();
        assert_eq!(link.bytes(), b"\x1b[H\x1b[2J\x1bR\x06".to_vec());
        assert_eq!(ctl.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_select_renders_slot() {
        let (mut ctl, link) = controller(6);
        ctl.edit_line(3, 0, "FIRST").unwrap();
        ctl.edit_line(3, 1, "SECOND").unwrap();
        assert!(link.bytes().is_empty());

        ctl.select_slot(3).unwrap();
        assert_eq!(link.bytes(), b"\x1b[H\x1b[2JFIRST\r\nSECOND".to_vec());
        assert_eq!(ctl.current_slot(), 3);
        assert_eq!(ctl.state(), SchedulerState::ShowingSlot(3));
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let (mut ctl, link) = controller(6);
        assert!(matches!(
            ctl.select_slot(6),
            Err(ControllerError::Store(StoreError::SlotOutOfRange { slot: 6, slots: 6 }))
        ));
        assert_eq!(ctl.current_slot(), 0);
        assert!(link.bytes().is_empty());
    }

    #[test]
    fn test_render_failure_still_moves_current() {
        let (mut ctl, link) = controller(3);
        ctl.edit_line(1, 0, "B").unwrap();
        link.set_write_failure(true);

        assert!(matches!(ctl.advance(), Err(ControllerError::Render(_))));
        assert_eq!(ctl.current_slot(), 1);
    }

    #[test]
    fn test_unknown_preset() {
        let (mut ctl, _link) = controller(6);
        assert!(matches!(
            ctl.apply_preset("Glastonbury"),
            Err(ControllerError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_enable_auto_rerenders_then_arms() {
        let (mut ctl, link) = controller(3);
        ctl.edit_line(0, 0, "A").unwrap();
        ctl.trigger_test_pattern().unwrap();
        link.reset();

        ctl.set_auto_advance(true, 5).unwrap();
        assert_eq!(link.bytes(), b"\x1b[H\x1b[2JA\r\n".to_vec());
        assert!(ctl.is_auto_advancing());
        assert!(!ctl.is_showing_test_pattern());
        assert_eq!(ctl.timer().pending().len(), 1);
    }

    #[test]
    fn test_tick_render_failure_keeps_rotating() {
        let (mut ctl, link) = controller(3);
        ctl.edit_line(0, 0, "A").unwrap();
        ctl.edit_line(1, 0, "B").unwrap();
        ctl.set_auto_advance(true, 5).unwrap();

        link.set_write_failure(true);
        let token = ctl.timer_mut().fire_next().unwrap();
        assert_eq!(ctl.on_tick(token), Some(1));
        assert_eq!(ctl.timer().pending().len(), 1);
    }

    #[test]
    fn test_zero_interval_stops_running_rotation() {
        let (mut ctl, link) = controller(3);
        ctl.edit_line(0, 0, "A").unwrap();
        ctl.edit_line(1, 0, "B").unwrap();
        ctl.set_auto_advance(true, 5).unwrap();

        assert!(!ctl.set_interval(0));
        assert!(!ctl.is_auto_advancing());
        assert_eq!(ctl.interval_secs(), 5);

        link.reset();
        if let Some(token) = ctl.timer_mut().fire_next() {
            assert_eq!(ctl.on_tick(token), None);
        }
        assert!(ctl.timer().pending().is_empty());
        assert!(link.bytes().is_empty());
    }

    #[test]
    fn test_rearm_with_zero_interval_cancels_pending_tick() {
        let (mut ctl, _link) = controller(3);
        ctl.set_auto_advance(true, 5).unwrap();
        assert_eq!(ctl.timer().pending().len(), 1);

        ctl.set_auto_advance(true, 0).unwrap();
        assert!(!ctl.is_auto_advancing());
        assert!(ctl.timer().pending().is_empty());
        assert_eq!(ctl.timer().cancelled(), 1);
    }

    #[test]
    fn test_shutdown_clears_and_stops() {
        let (mut ctl, link) = controller(3);
        ctl.set_auto_advance(true, 5).unwrap();
        link.reset();

        ctl.shutdown().unwrap();
        assert!(!ctl.is_auto_advancing());
        assert_eq!(link.bytes(), b"\x1b[2J".to_vec());
    }
}
