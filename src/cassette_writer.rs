// CSAVE: capture of the byte stream BASIC writes to the cassette port
//
// The firmware ends a program with three 0x00 bytes. Once three zeros in a row
// have been seen (and the stream is at least 7 bytes long) the captured bytes
// are written to `<name>.bin` / `<name>.txt`, where name is the 4th byte.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    config::{CassetteConfig, SaveFormat},
    error::IoError,
    utils::hexdump,
};

pub const CASSETTE_PORT: u8 = 0x07;

const END_ZERO_RUN: usize = 3;
const MIN_PROGRAM_LEN: usize = 7;
const NAME_OFFSET: usize = 3;
const VALUES_PER_LINE: usize = 10;

#[derive(Debug)]
pub struct CassetteWriter {
    buffer: Vec<u8>,
    capacity: usize,
    zero_run: usize,

    save_dir: PathBuf,
    format: SaveFormat,
    reset_after_save: bool,
    saves: usize,
}

impl CassetteWriter {
    pub fn new(config: &CassetteConfig) -> Self {
        Self {
            buffer: Vec::with_capacity(config.capacity),
            capacity: config.capacity,
            zero_run: 0,
            save_dir: config.save_dir.clone(),
            format: config.save_format,
            reset_after_save: config.reset_after_save,
            saves: 0,
        }
    }

    /// Appends a byte to the capture. Returns the file written when this byte
    /// completed a program.
    pub fn write_data(&mut self, value: u8) -> Result<Option<PathBuf>, IoError> {
        if self.buffer.len() >= self.capacity {
            tracing::error!(
                "[CSAVE] Buffer overrun at {} bytes, dropping {:02X}",
                self.buffer.len(),
                value
            );
            return Err(IoError::BufferOverrun {
                port: CASSETTE_PORT,
                capacity: self.capacity,
            });
        }

        self.buffer.push(value);
        if value == 0 {
            self.zero_run += 1;
        } else {
            self.zero_run = 0;
        }

        if self.zero_run == END_ZERO_RUN && self.buffer.len() >= MIN_PROGRAM_LEN {
            let path = self.save()?;
            return Ok(Some(path));
        }

        Ok(None)
    }

    fn save(&mut self) -> Result<PathBuf, IoError> {
        let path = self.save_dir.join(self.file_name());

        let file = File::create(&path).map_err(|source| IoError::ResourceOpen {
            path: path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        self.materialize(&mut out)?;
        out.flush()?;

        self.saves += 1;
        tracing::info!(
            "[CSAVE] Saved {} bytes to {}",
            self.buffer.len(),
            path.display()
        );
        tracing::debug!("[CSAVE] Program bytes:\n{}", hexdump(&self.buffer));

        if self.reset_after_save {
            self.buffer.clear();
            self.zero_run = 0;
        }

        Ok(path)
    }

    /// `<name>.<ext>` where name is the 4th captured byte. Bytes that would
    /// leave the save directory, or are not printable ASCII, become `_`.
    pub fn file_name(&self) -> String {
        let ch = match self.buffer.get(NAME_OFFSET) {
            Some(&b) if b.is_ascii_graphic() && !matches!(b, b'/' | b'\\' | b'.' | b':') => {
                b as char
            }
            _ => '_',
        };
        format!("{}.{}", ch, self.format.extension())
    }

    pub fn materialize<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        match self.format {
            SaveFormat::Binary => {
                let bytes: Vec<u8> = self.buffer.iter().map(|b| b & 0x7F).collect();
                out.write_all(&bytes)?;
            }
            SaveFormat::Text => {
                for (i, b) in self.buffer.iter().enumerate() {
                    write!(out, "{:#04x}, ", b & 0x7F)?;
                    if (i + 1) % VALUES_PER_LINE == 0 {
                        writeln!(out)?;
                    }
                }
            }
        }
        writeln!(out)
    }

    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn zero_run(&self) -> usize {
        self.zero_run
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(format: SaveFormat) -> CassetteWriter {
        CassetteWriter::new(&CassetteConfig {
            save_format: format,
            ..Default::default()
        })
    }

    fn text(writer: &CassetteWriter) -> String {
        let mut out = Vec::new();
        writer.materialize(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_zero_run_counter() {
        let mut w = writer(SaveFormat::Text);
        for b in [0, 0, 5, 0] {
            w.write_data(b).unwrap();
        }
        assert_eq!(w.zero_run(), 1);
        assert_eq!(w.saves(), 0);
    }

    #[test]
    fn test_short_stream_never_saves() {
        let mut w = writer(SaveFormat::Text);
        for b in [b'X', 0, 0, 0, 0, 0] {
            assert_eq!(w.write_data(b).unwrap(), None);
        }
        assert_eq!(w.saves(), 0);
        assert_eq!(w.buffered().len(), 6);
    }

    #[test]
    fn test_text_format() {
        let mut w = writer(SaveFormat::Text);
        w.buffer.extend_from_slice(&[0x41, 0x00, 0x00, 0x00]);
        assert_eq!(text(&w), "0x41, 0x00, 0x00, 0x00, \n");
    }

    #[test]
    fn test_text_format_breaks_after_ten_values() {
        let mut w = writer(SaveFormat::Text);
        w.buffer.extend(1..=12u8);
        assert_eq!(
            text(&w),
            "0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, \n0x0b, 0x0c, \n"
        );
    }

    #[test]
    fn test_text_format_masks_high_bit() {
        let mut w = writer(SaveFormat::Text);
        w.buffer.push(0xC1);
        assert_eq!(text(&w), "0x41, \n");
    }

    #[test]
    fn test_binary_format() {
        let mut w = writer(SaveFormat::Binary);
        w.buffer.extend_from_slice(&[0xD3, b'Q', 0x00]);
        let mut out = Vec::new();
        w.materialize(&mut out).unwrap();
        assert_eq!(out, vec![0x53, b'Q', 0x00, b'\n']);
    }

    #[test]
    fn test_file_name() {
        let mut w = writer(SaveFormat::Binary);
        w.buffer.extend_from_slice(&[0xD3, 0xD3, 0xD3, b'Q']);
        assert_eq!(w.file_name(), "Q.bin");

        w.buffer[3] = b'/';
        assert_eq!(w.file_name(), "_.bin");

        w.buffer[3] = 0;
        assert_eq!(w.file_name(), "_.bin");

        w.buffer[3] = 0xC1;
        assert_eq!(w.file_name(), "_.bin");
        assert_eq!(w.file_name().len(), 5);
    }

    #[test]
    fn test_overrun() {
        let mut w = CassetteWriter::new(&CassetteConfig {
            capacity: 8,
            ..Default::default()
        });
        for b in 1..=8u8 {
            w.write_data(b).unwrap();
        }
        let err = w.write_data(9).unwrap_err();
        assert!(matches!(
            err,
            IoError::BufferOverrun {
                port: CASSETTE_PORT,
                capacity: 8
            }
        ));
        assert_eq!(w.buffered().len(), 8);
    }
}
