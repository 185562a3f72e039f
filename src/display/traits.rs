/*
 *  display/traits.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the display link abstraction
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

use crate::display::error::TransportError;

/// Minimal link abstraction - anything that can carry bytes to the display
///
/// The device never answers, so there is no read side. Implementations
/// make a single write attempt per call: a short write is an error and is
/// not retried, a wedged link must not stall the caller.
pub trait Transport: Send {
    /// Write the whole buffer or report why not
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Human readable name of the link, for logging
    fn name(&self) -> &str {
        "display"
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
