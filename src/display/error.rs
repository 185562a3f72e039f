/*
 *  display/error.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for display subsystem
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

use thiserror::Error;

use crate::messages::StoreError;

/// Errors raised by the serial link.
///
/// `Open` and `Configure` are fatal for the process; the rest are
/// transient and reported per write.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Device node could not be opened
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// Line settings could not be applied
    #[error("cannot configure {path}: {reason}")]
    Configure { path: String, reason: String },

    /// The driver accepted fewer bytes than offered
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    /// Write failed outright
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// True for open/configure failures that leave the link unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransportError::Open { .. } | TransportError::Configure { .. })
    }
}

/// Errors surfaced by the controller to the presentation surface.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Caller supplied a slot or line outside the configured bounds
    #[error(transparent)]
    Store(#[from] StoreError),

    /// State was updated but the device write failed
    #[error("render failed: {0}")]
    Render(#[from] TransportError),

    /// No preset of that name
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}
