// I/O subsystem error types

use std::{fmt, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{direction} 0x{port:02x}")]
    UnmappedPort { direction: Direction, port: u8 },

    #[error("buffer overrun on port 0x{port:02x} writing ({capacity} bytes)")]
    BufferOverrun { port: u8, capacity: usize },

    #[error("unable to open {}: {source}", .path.display())]
    ResourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

impl IoError {
    /// The port named by the error, when there is one.
    pub fn port(&self) -> Option<u8> {
        match self {
            IoError::UnmappedPort { port, .. } | IoError::BufferOverrun { port, .. } => Some(*port),
            _ => None,
        }
    }
}

/// An unrecoverable I/O error stamped with the program counter it happened at.
#[derive(Debug, Error)]
#[error("{pc:04x}: {error}")]
pub struct Fault {
    pub pc: u16,
    #[source]
    pub error: IoError,
}
