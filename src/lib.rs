//! Message rotator for BA63/BA66 serial customer displays.
//!
//! The display is driven over a raw 9600 baud serial link with a small
//! escape-sequence protocol. A fixed set of message slots is shown one at
//! a time, either on request or on a timer, skipping blank slots.

pub mod config;
pub mod console;
pub mod constants;
pub mod display;
pub mod messages;
pub mod presets;

pub use display::{ControllerConfig, DisplayController};
pub use messages::{MessageStore, StoreError};
pub use presets::{PresetSet, find_preset};
