//! Message slots and their text, independent of how they get edited.

use thiserror::Error;

use crate::constants::{DISPLAY_COLUMNS, MAX_ROWS};
use crate::presets::PresetSet;

/// Error type for slot/line addressing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("slot {slot} out of range (0..{slots})")]
    SlotOutOfRange { slot: usize, slots: usize },
    #[error("line {line} out of range (0..{lines})")]
    LineOutOfRange { line: usize, lines: usize },
}

/// One message: up to `MAX_ROWS` lines of at most `DISPLAY_COLUMNS` chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSlot {
    lines: [String; MAX_ROWS],
}

impl MessageSlot {
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn clear(&mut self) {
        self.lines.iter_mut().for_each(String::clear);
    }
}

/// Fixed array of message slots, created empty and never resized.
///
/// Every slot stores `MAX_ROWS` lines; only the first `active_lines` are
/// shown and only those count towards blankness.
#[derive(Debug, Clone)]
pub struct MessageStore {
    slots: Vec<MessageSlot>,
    active_lines: usize,
}

impl MessageStore {
    /// `slots` and `active_lines` must be at least 1; `active_lines` is
    /// capped at `MAX_ROWS`.
    pub fn new(slots: usize, active_lines: usize) -> Self {
        Self {
            slots: vec![MessageSlot::default(); slots.max(1)],
            active_lines: active_lines.clamp(1, MAX_ROWS),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn active_lines(&self) -> usize {
        self.active_lines
    }

    fn slot(&self, slot: usize) -> Result<&MessageSlot, StoreError> {
        self.slots.get(slot).ok_or(StoreError::SlotOutOfRange {
            slot,
            slots: self.slots.len(),
        })
    }

    /// Store `text` in one line of a slot, keeping the first 20 characters.
    ///
    /// Lines beyond the active count may be written; they are kept but not
    /// shown until the display is configured with more rows.
    pub fn set_line(&mut self, slot: usize, line: usize, text: &str) -> Result<(), StoreError> {
        let slots = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(StoreError::SlotOutOfRange { slot, slots })?;
        let stored = entry
            .lines
            .get_mut(line)
            .ok_or(StoreError::LineOutOfRange { line, lines: MAX_ROWS })?;

        stored.clear();
        stored.extend(text.chars().take(DISPLAY_COLUMNS));
        Ok(())
    }

    /// The active lines of a slot, in display order.
    pub fn get_lines(&self, slot: usize) -> Result<Vec<String>, StoreError> {
        let entry = self.slot(slot)?;
        Ok(entry.lines[..self.active_lines].to_vec())
    }

    /// True iff every active line of the slot is empty.
    pub fn is_blank(&self, slot: usize) -> Result<bool, StoreError> {
        let entry = self.slot(slot)?;
        Ok(entry.lines[..self.active_lines].iter().all(String::is_empty))
    }

    /// Blank every line of every slot.
    pub fn clear_all(&mut self) {
        self.slots.iter_mut().for_each(MessageSlot::clear);
    }

    /// Clear then fill: every slot is blanked before the preset's
    /// contents go in, so slots the preset does not name end up empty.
    /// Preset entries beyond the slot count are dropped.
    pub fn apply_preset(&mut self, preset: &PresetSet) {
        self.clear_all();
        for (slot, lines) in preset.slots.iter().enumerate().take(self.slots.len()) {
            for (line, text) in lines.iter().enumerate().take(MAX_ROWS) {
                let stored = &mut self.slots[slot].lines[line];
                stored.extend(text.chars().take(DISPLAY_COLUMNS));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::find_preset;

    #[test]
    fn test_new_store_is_blank() {
        let store = MessageStore::new(6, 2);
        assert_eq!(store.slot_count(), 6);
        for slot in 0..6 {
            assert!(store.is_blank(slot).unwrap());
            assert_eq!(store.get_lines(slot).unwrap(), vec![String::new(), String::new()]);
        }
    }

    #[test]
    fn test_set_line_truncates_to_column_width() {
        let mut store = MessageStore::new(6, 2);
        store.set_line(0, 0, "ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();
        assert_eq!(store.get_lines(0).unwrap()[0], "ABCDEFGHIJKLMNOPQRST");
    }

    #[test]
    fn test_set_line_truncates_by_character_not_byte() {
        let mut store = MessageStore::new(1, 2);
        let text: String = std::iter::repeat('\u{e9}').take(25).collect();
        store.set_line(0, 1, &text).unwrap();
        assert_eq!(store.get_lines(0).unwrap()[1].chars().count(), 20);
    }

    #[test]
    fn test_set_line_bounds() {
        let mut store = MessageStore::new(6, 2);
        assert_eq!(
            store.set_line(6, 0, "X"),
            Err(StoreError::SlotOutOfRange { slot: 6, slots: 6 })
        );
        assert_eq!(
            store.set_line(0, 4, "X"),
            Err(StoreError::LineOutOfRange { line: 4, lines: 4 })
        );
        assert!(store.get_lines(9).is_err());
        assert!(store.is_blank(9).is_err());
    }

    #[test]
    fn test_blankness_only_counts_active_lines() {
        let mut store = MessageStore::new(2, 2);
        store.set_line(0, 3, "HIDDEN").unwrap();
        assert!(store.is_blank(0).unwrap());
        assert_eq!(store.get_lines(0).unwrap().len(), 2);

        let mut four = MessageStore::new(2, 4);
        four.set_line(0, 3, "SHOWN").unwrap();
        assert!(!four.is_blank(0).unwrap());
        assert_eq!(four.get_lines(0).unwrap()[3], "SHOWN");
    }

    #[test]
    fn test_apply_preset_clears_unmentioned_slots() {
        let mut store = MessageStore::new(6, 2);
        for slot in 0..6 {
            store.set_line(slot, 0, "OLD").unwrap();
            store.set_line(slot, 3, "OLD").unwrap();
        }

        store.apply_preset(find_preset("LUG").unwrap());

        assert_eq!(store.get_lines(0).unwrap(), vec!["  BRISTOL AND BATH", "  LINUX USER GROUP"]);
        assert_eq!(store.get_lines(1).unwrap(), vec!["  Bristol and Bath", "  Linux User Group"]);
        for slot in 2..6 {
            assert!(store.is_blank(slot).unwrap());
        }
        // hidden rows are cleared too
        let four = {
            let mut s = MessageStore::new(6, 4);
            s.set_line(5, 3, "OLD").unwrap();
            s.apply_preset(find_preset("LUG").unwrap());
            s
        };
        assert!(four.is_blank(5).unwrap());
    }

    #[test]
    fn test_apply_preset_into_smaller_store() {
        let mut store = MessageStore::new(3, 2);
        store.apply_preset(find_preset("Memes").unwrap());
        assert_eq!(store.slot_count(), 3);
        assert_eq!(store.get_lines(2).unwrap(), vec!["SOON MAY THE", " WELLERMAN COME"]);
    }
}
