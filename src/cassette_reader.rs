// CLOAD: tape playback from a file, one byte per data read

use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
};

use crate::error::IoError;

/// Status returned by the cassette status port; the tape is always ready.
pub const CASSETTE_READY: u8 = 0x00;

/// Value returned once the tape is missing or has run out.
pub const END_OF_TAPE: u8 = 0x00;

#[derive(Debug)]
enum TapeState {
    Closed,
    Open(BufReader<File>),
    Exhausted,
}

#[derive(Debug)]
pub struct CassetteReader {
    path: PathBuf,
    state: TapeState,
    bytes_read: usize,
}

impl CassetteReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: TapeState::Closed,
            bytes_read: 0,
        }
    }

    pub fn status(&self) -> u8 {
        CASSETTE_READY
    }

    pub fn read_data(&mut self) -> u8 {
        if let TapeState::Closed = self.state {
            self.state = match Self::open(&self.path) {
                Ok(file) => {
                    tracing::info!("[CLOAD] Opened {}", self.path.display());
                    TapeState::Open(file)
                }
                Err(e) => {
                    tracing::error!("[CLOAD] {}", e);
                    TapeState::Exhausted
                }
            };
        }

        let TapeState::Open(file) = &mut self.state else {
            return END_OF_TAPE;
        };

        let mut byte = [0u8; 1];
        loop {
            match file.read(&mut byte) {
                Ok(1) => {
                    self.bytes_read += 1;
                    return byte[0];
                }
                Ok(_) => {
                    tracing::info!(
                        "[CLOAD] End of tape after {} bytes",
                        self.bytes_read
                    );
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!("[CLOAD] Read failed after {} bytes: {}", self.bytes_read, e);
                    break;
                }
            }
        }

        self.state = TapeState::Exhausted;
        END_OF_TAPE
    }

    fn open(path: &Path) -> Result<BufReader<File>, IoError> {
        File::open(path)
            .map(BufReader::new)
            .map_err(|source| IoError::ResourceOpen {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TapeState::Open(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, TapeState::Exhausted)
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
