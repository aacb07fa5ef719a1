// Serial terminal (88-2SIO style) attached to the console
//
// Status is bit 0 = receive data available, bit 1 = transmit buffer empty.
// Transmit is always ready; output is never buffered.

use std::io::Write;

use derivative::Derivative;

use crate::{error::IoError, keyboard::Keyboard};

pub const STATUS_READY: u8 = 0b11;
pub const STATUS_NOT_READY: u8 = 0b10;

const LF: u8 = 0x0A;
const CR: u8 = 0x0D;

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Terminal<K, W> {
    #[derivative(Debug = "ignore")]
    keyboard: K,
    #[derivative(Debug = "ignore")]
    output: W,

    // character picked up by a status query, handed to the next data read
    latch: Option<u8>,
}

impl<K: Keyboard, W: Write> Terminal<K, W> {
    pub fn new(keyboard: K, output: W) -> Self {
        Self {
            keyboard,
            output,
            latch: None,
        }
    }

    /// Reads a character straight from the keyboard, 0 if none is waiting.
    /// Line feeds are turned into carriage returns here, at acquisition.
    pub fn poll_input(&mut self) -> u8 {
        if !self.keyboard.char_available() {
            return 0;
        }

        match self.keyboard.read_char() {
            LF => CR,
            ch => ch,
        }
    }

    pub fn status(&mut self) -> u8 {
        if self.latch.is_none() {
            let ch = self.poll_input();
            if ch != 0 {
                tracing::trace!("[TERM] Latched {:02X}", ch);
                self.latch = Some(ch);
            }
        }

        if self.latch.is_some() {
            STATUS_READY
        } else {
            STATUS_NOT_READY
        }
    }

    pub fn read_data(&mut self) -> u8 {
        match self.latch.take() {
            Some(ch) => ch,
            None => self.poll_input(),
        }
    }

    pub fn write_data(&mut self, value: u8) -> Result<(), IoError> {
        self.output.write_all(&[value & 0x7F])?;
        self.output.flush()?;
        Ok(())
    }

    pub fn latched(&self) -> Option<u8> {
        self.latch
    }

    pub fn keyboard_mut(&mut self) -> &mut K {
        &mut self.keyboard
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::BufferedKeyboard;

    fn terminal(input: &str) -> Terminal<BufferedKeyboard, Vec<u8>> {
        let mut kbd = BufferedKeyboard::new();
        kbd.push_str(input);
        Terminal::new(kbd, Vec::new())
    }

    #[test]
    fn test_line_feed_becomes_carriage_return() {
        let mut term = terminal("A\n");
        assert_eq!(term.poll_input(), b'A');
        assert_eq!(term.poll_input(), CR);
        assert_eq!(term.poll_input(), 0);
    }

    #[test]
    fn test_status_without_input() {
        let mut term = terminal("");
        assert_eq!(term.status(), STATUS_NOT_READY);
        assert_eq!(term.read_data(), 0);
    }

    #[test]
    fn test_latch_is_consumed_once() {
        let mut term = terminal("X");
        assert_eq!(term.status(), STATUS_READY);
        assert_eq!(term.latched(), Some(b'X'));
        assert_eq!(term.read_data(), b'X');
        assert_eq!(term.latched(), None);
        assert_eq!(term.read_data(), 0);
    }

    #[test]
    fn test_status_keeps_existing_latch() {
        let mut term = terminal("XY");
        assert_eq!(term.status(), STATUS_READY);
        assert_eq!(term.status(), STATUS_READY);
        assert_eq!(term.read_data(), b'X');
        assert_eq!(term.read_data(), b'Y');
    }

    #[test]
    fn test_latched_line_feed() {
        let mut term = terminal("\n");
        term.status();
        assert_eq!(term.read_data(), CR);
    }

    #[test]
    fn test_write_masks_high_bit() {
        let mut term = terminal("");
        term.write_data(b'H' | 0x80).unwrap();
        term.write_data(b'i').unwrap();
        assert_eq!(term.output(), b"Hi");
    }
}
