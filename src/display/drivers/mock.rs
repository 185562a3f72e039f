/*
 *  display/drivers/mock.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display link for testing without hardware
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

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::error::TransportError;
use crate::display::traits::Transport;

/// Mock display link for testing
///
/// This link simulates the serial display without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Running the console without a BA63 attached (`--dry-run`)
///
/// Every write is recorded and the accumulated byte stream is available
/// for verification in tests.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Shared state for testing
    state: Arc<Mutex<MockTransportState>>,
}

/// Internal state for the mock link (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockTransportState {
    /// Every successful write, in order
    pub writes: Vec<Vec<u8>>,

    /// All bytes that reached the "device"
    pub bytes: Vec<u8>,

    /// Number of times write() was called, failed or not
    pub write_count: usize,

    /// Simulate failures (for error testing)
    pub simulate_write_failure: bool,
    /// Accept only this many bytes of each write
    pub simulate_short_write: Option<usize>,
}

impl MockTransport {
    /// Create a new mock link
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockTransportState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockTransportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of everything written so far
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().bytes.clone()
    }

    /// Forget recorded output (useful between steps of a test)
    pub fn reset(&self) {
        let mut state = self.lock();
        state.writes.clear();
        state.bytes.clear();
        state.write_count = 0;
    }

    pub fn set_write_failure(&self, fail: bool) {
        self.lock().simulate_write_failure = fail;
    }
}

impl Transport for MockTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.write_count += 1;

        if state.simulate_write_failure {
            return Err(TransportError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Simulated write failure",
            )));
        }

        if let Some(limit) = state.simulate_short_write {
            if limit < bytes.len() {
                state.bytes.extend_from_slice(&bytes[..limit]);
                return Err(TransportError::ShortWrite {
                    expected: bytes.len(),
                    written: limit,
                });
            }
        }

        state.writes.push(bytes.to_vec());
        state.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_transport_records_writes() {
        let mut link = MockTransport::new();
        link.write(b"\x1b[H").unwrap();
        link.write(b"HELLO").unwrap();

        let state = link.state();
        let state = state.lock().unwrap();
        assert_eq!(state.write_count, 2);
        assert_eq!(state.writes.len(), 2);
        assert_eq!(state.bytes, b"\x1b[HHELLO".to_vec());
    }

    #[test]
    fn test_mock_transport_simulated_failure() {
        let mut link = MockTransport::new();

        link.set_write_failure(true);
        assert!(link.write(b"X").is_err());
        assert!(link.bytes().is_empty());

        link.set_write_failure(false);
        assert!(link.write(b"X").is_ok());
        assert_eq!(link.bytes(), b"X".to_vec());
    }

    #[test]
    fn test_mock_transport_short_write() {
        let mut link = MockTransport::new();
        link.state().lock().unwrap().simulate_short_write = Some(2);

        match link.write(b"ABCD") {
            Err(TransportError::ShortWrite { expected, written }) => {
                assert_eq!(expected, 4);
                assert_eq!(written, 2);
            }
            other => panic!("expected short write, got {:?}", other),
        }
        assert_eq!(link.bytes(), b"AB".to_vec());
    }

    #[test]
    fn test_clones_share_state() {
        let link = MockTransport::new();
        let mut writer = link.clone();
        writer.write(b"abc").unwrap();
        assert_eq!(link.bytes(), b"abc".to_vec());

        link.reset();
        assert!(writer.bytes().is_empty());
    }
}
