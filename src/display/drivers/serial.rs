/*
 *  display/drivers/serial.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Raw serial link to the display
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

use std::io::Write;
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::constants::{DEFAULT_BAUD, WRITE_TIMEOUT_MS};
use crate::display::error::TransportError;
use crate::display::traits::Transport;

/// Serial link to a BA63 class display
///
/// Opened once, held for the life of the process. The port is put into
/// raw mode at 8 data bits, odd parity, one stop bit, no flow control and
/// with modem control lines ignored.
pub struct SerialTransport {
    path: String,
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the display at the documented 9600 baud
    pub fn open(path: &str) -> Result<Self, TransportError> {
        Self::open_with_baud(path, DEFAULT_BAUD)
    }

    /// Open with an explicit line rate
    ///
    /// Any failure here leaves the link unusable; callers are expected to
    /// treat it as fatal.
    pub fn open_with_baud(path: &str, baud: u32) -> Result<Self, TransportError> {
        debug!("Opening serial display {} at {} baud", path, baud);

        let port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::Odd)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(WRITE_TIMEOUT_MS))
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::InvalidInput => TransportError::Configure {
                    path: path.to_string(),
                    reason: e.description.clone(),
                },
                _ => TransportError::Open { path: path.to_string(), source: e },
            })?;

        let transport = Self { path: path.to_string(), port };
        transport.verify(baud)?;

        info!("Serial display {} open: {} baud, 8O1, raw", path, baud);
        Ok(transport)
    }

    /// Read back the line settings after open
    fn verify(&self, baud: u32) -> Result<(), TransportError> {
        let configure = |reason: String| TransportError::Configure {
            path: self.path.clone(),
            reason,
        };

        let actual_baud = self.port.baud_rate().map_err(|e| configure(e.description))?;
        if actual_baud != baud {
            return Err(configure(format!("baud rate is {}, wanted {}", actual_baud, baud)));
        }

        let parity = self.port.parity().map_err(|e| configure(e.description))?;
        if parity != Parity::Odd {
            return Err(configure(format!("parity is {:?}, wanted odd", parity)));
        }

        let data_bits = self.port.data_bits().map_err(|e| configure(e.description))?;
        if data_bits != DataBits::Eight {
            return Err(configure(format!("data bits is {:?}, wanted 8", data_bits)));
        }

        Ok(())
    }

    /// Device node this link was opened on
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if bytes.is_empty() {
            return Ok(());
        }

        // One attempt only
        let written = self.port.write(bytes)?;
        if written != bytes.len() {
            return Err(TransportError::ShortWrite {
                expected: bytes.len(),
                written,
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device_is_fatal() {
        let err = match SerialTransport::open("/dev/ba63mon-does-not-exist") {
            Ok(_) => panic!("opened a device node that does not exist"),
            Err(e) => e,
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/dev/ba63mon-does-not-exist"));
    }
}
