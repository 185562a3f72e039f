//! This module contains global constants used across the display and other modules.

/// Escape, the lead-in byte of every control sequence.
pub const ESC: u8 = 0x1b;

/// Clear screen, `ESC [ 2 J`.
pub const SEQ_CLEAR: &[u8] = b"\x1b[2J";
/// Home cursor, `ESC [ H`.
pub const SEQ_HOME: &[u8] = b"\x1b[H";
/// Select national character set, `ESC R <code>` (code appended).
pub const SEQ_CHARSET: &[u8] = &[ESC, b'R'];
/// Row terminator, sent between rows and never after the last one.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Full-block glyph used by the lamp test.
pub const TEST_PATTERN_BYTE: u8 = 0xdb;
/// Substituted for characters the single-byte device cannot show.
pub const UNMAPPABLE_BYTE: u8 = b'?';

/// Characters per row on the BA63/BA66.
pub const DISPLAY_COLUMNS: usize = 20;
/// Rows held per message slot; the BA66 shows four, the BA63 two.
pub const MAX_ROWS: usize = 4;
/// Rows the BA63 actually shows.
pub const DEFAULT_ACTIVE_LINES: usize = 2;
/// Message slots offered to the user.
pub const DEFAULT_SLOTS: usize = 6;
/// Upper bound on configurable slots.
pub const MAX_SLOTS: usize = 16;

/// Fixed line rate of the display.
pub const DEFAULT_BAUD: u32 = 9600;
/// Where the USB serial adapter usually lands.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
/// Character set selected at start-up.
pub const DEFAULT_CHARSET: u8 = 6;
/// Serial write timeout in milliseconds.
pub const WRITE_TIMEOUT_MS: u64 = 500;

/// Auto-advance interval bounds and default, in seconds.
pub const MIN_INTERVAL_SECS: u32 = 2;
pub const MAX_INTERVAL_SECS: u32 = 3600;
pub const DEFAULT_INTERVAL_SECS: u32 = 5;
