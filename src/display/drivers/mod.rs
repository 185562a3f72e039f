/*
 *  display/drivers/mod.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display link implementations
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

// Real hardware over a USB serial adapter
pub mod serial;

// Mock link for testing (always available)
pub mod mock;

pub use mock::{MockTransport, MockTransportState};
pub use serial::SerialTransport;
