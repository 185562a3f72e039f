/*
 *  display/mod.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - serial link, BA63 protocol and slot rotation
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

// Core trait definitions
pub mod traits;
pub mod error;

// Display links
pub mod drivers;

// Escape-sequence protocol
pub mod protocol;

// Rotation state machine and its timer
pub mod scheduler;
pub mod timer;

// Owning controller
pub mod controller;

// Re-exports for convenience
pub use traits::Transport;
pub use error::{ControllerError, TransportError};
pub use drivers::{MockTransport, SerialTransport};
pub use protocol::DisplayProtocol;
pub use scheduler::{RotationScheduler, SchedulerState};
pub use timer::{ManualTimer, TickToken, TimerHost, TokioTimer};
pub use controller::{ControllerConfig, DisplayController};
