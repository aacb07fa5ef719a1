use std::{
    collections::VecDeque,
    io::Read,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

/// Non-blocking character source behind the serial terminal.
pub trait Keyboard {
    fn char_available(&mut self) -> bool;

    /// Next pending character, or 0 when nothing is waiting.
    fn read_char(&mut self) -> u8;
}

/// Keyboard fed from a queue, used for scripted input.
#[derive(Debug, Clone, Default)]
pub struct BufferedKeyboard {
    pending: VecDeque<u8>,
}

impl BufferedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ch: u8) {
        self.pending.push_back(ch);
    }

    pub fn push_str(&mut self, text: &str) {
        self.pending.extend(text.bytes());
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Keyboard for BufferedKeyboard {
    fn char_available(&mut self) -> bool {
        !self.pending.is_empty()
    }

    fn read_char(&mut self) -> u8 {
        self.pending.pop_front().unwrap_or(0)
    }
}

/// Keyboard draining bytes sent over a channel without ever blocking.
pub struct ChannelKeyboard {
    rx: Receiver<u8>,
    peeked: Option<u8>,
}

impl ChannelKeyboard {
    pub fn new(rx: Receiver<u8>) -> Self {
        Self { rx, peeked: None }
    }

    /// Spawns a thread forwarding raw stdin bytes to the returned keyboard.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = std::io::stdin();
            for byte in stdin.lock().bytes() {
                match byte {
                    Ok(byte) => {
                        if tx.send(byte).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("[KBD] stdin read failed: {}", e);
                        break;
                    }
                }
            }
            tracing::debug!("[KBD] stdin closed");
        });

        Self::new(rx)
    }

    fn fill(&mut self) {
        if self.peeked.is_none() {
            match self.rx.try_recv() {
                Ok(byte) => self.peeked = Some(byte),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
    }
}

impl Keyboard for ChannelKeyboard {
    fn char_available(&mut self) -> bool {
        self.fill();
        self.peeked.is_some()
    }

    fn read_char(&mut self) -> u8 {
        self.fill();
        self.peeked.take().unwrap_or(0)
    }
}
