/*
 *  display/protocol.rs
 *
 *  ba63mon - message rotator for BA63/BA66 displays
 *  (c) 2020-26 Stuart Hunter
 *
 *  BA63 escape-sequence protocol
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

use log::debug;

use crate::constants::{
    LINE_TERMINATOR, SEQ_CHARSET, SEQ_CLEAR, SEQ_HOME, TEST_PATTERN_BYTE, UNMAPPABLE_BYTE,
};
use crate::display::error::TransportError;
use crate::display::traits::Transport;

/// Translates display intents into BA63 control sequences
///
/// | Action        | Bytes          |
/// |---------------|----------------|
/// | clear screen  | `ESC [ 2 J`    |
/// | home cursor   | `ESC [ H`      |
/// | character set | `ESC R <code>` |
/// | next row      | `CR LF`        |
pub struct DisplayProtocol<T: Transport> {
    transport: T,
}

impl<T: Transport> DisplayProtocol<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        debug!("{} <- {:02x?}", self.transport.name(), bytes);
        self.transport.write(bytes)
    }

    /// Clear the screen; cursor position afterwards is device defined
    pub fn clear(&mut self) -> Result<(), TransportError> {
        self.send(SEQ_CLEAR)
    }

    pub fn home(&mut self) -> Result<(), TransportError> {
        self.send(SEQ_HOME)
    }

    /// Select a national character set. Codes the device does not know
    /// are ignored by the device.
    pub fn set_character_set(&mut self, code: u8) -> Result<(), TransportError> {
        let mut seq = SEQ_CHARSET.to_vec();
        seq.push(code);
        self.send(&seq)
    }

    /// Show one slot: home, clear, then the rows separated by CR LF.
    ///
    /// Home must precede clear so every render starts writing at the
    /// top left. No terminator follows the last row.
    pub fn render_slot<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<(), TransportError> {
        let frame = render_frame(lines.iter().map(|l| encode_text(l.as_ref())));
        self.send(&frame)
    }

    /// Lamp test: two rows of the full-block glyph, `width` columns each
    pub fn render_test_pattern(&mut self, width: usize) -> Result<(), TransportError> {
        let row = vec![TEST_PATTERN_BYTE; width];
        let frame = render_frame([row.clone(), row]);
        self.send(&frame)
    }
}

fn render_frame<I>(rows: I) -> Vec<u8>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let mut frame = Vec::with_capacity(64);
    frame.extend_from_slice(SEQ_HOME);
    frame.extend_from_slice(SEQ_CLEAR);
    for (i, row) in rows.into_iter().enumerate() {
        if i > 0 {
            frame.extend_from_slice(LINE_TERMINATOR);
        }
        frame.extend_from_slice(&row);
    }
    frame
}

/// Map text onto the single byte device character set.
///
/// Code points up to U+00FF go out as that byte, anything wider as `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(UNMAPPABLE_BYTE))
        .collect()
}
