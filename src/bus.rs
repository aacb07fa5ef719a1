// +------+-----------------------------------+-------------------------------+
// | Port | IN                                | OUT                           |
// +------+-----------------------------------+-------------------------------+
// | 0x00 | unused (0)                        | -                             |
// | 0x01 | Console: raw character poll       | Console: character out        |
// | 0x06 | Cassette: status (always ready)   | -                             |
// | 0x07 | Cassette: CLOAD data              | Cassette: CSAVE data          |
// | 0x08 | Disk: status                      | Disk: drive select            |
// | 0x09 | Disk: current sector              | Disk: function                |
// | 0x0A | Disk: read data                   | Disk: write data              |
// | 0x10 | 2SIO port 1: status               | 2SIO port 1: control (ignored)|
// | 0x11 | 2SIO port 1: data                 | 2SIO port 1: data             |
// | 0x12 | -                                 | ignored                       |
// | 0xFF | Front panel sense switches        | -                             |
// +------+-----------------------------------+-------------------------------+
//
// Anything else is an unmapped port and stops the machine.
use std::io::Write;

use crate::{
    cassette_reader::CassetteReader,
    cassette_writer::CassetteWriter,
    config::Config,
    disk::{DiskController, DiskProxy},
    error::{Direction, IoError},
    keyboard::Keyboard,
    terminal::Terminal,
};

pub const PORT_UNUSED: u8 = 0x00;
pub const PORT_CONSOLE: u8 = 0x01;
pub const PORT_CASSETTE_STATUS: u8 = 0x06;
pub const PORT_CASSETTE_DATA: u8 = 0x07;
pub const PORT_DISK_STATUS: u8 = 0x08;
pub const PORT_DISK_SECTOR: u8 = 0x09;
pub const PORT_DISK_DATA: u8 = 0x0A;
pub const PORT_SIO_STATUS: u8 = 0x10;
pub const PORT_SIO_DATA: u8 = 0x11;
pub const PORT_RESERVED: u8 = 0x12;
pub const PORT_SENSE_SWITCHES: u8 = 0xFF;

#[derive(Debug)]
pub struct Bus<K, W, D> {
    // I/O Devices
    pub terminal: Terminal<K, W>,
    pub cassette_in: CassetteReader,
    pub cassette_out: CassetteWriter,
    pub disk: DiskProxy<D>,

    sense_switches: u8,
}

impl<K: Keyboard, W: Write, D: DiskController> Bus<K, W, D> {
    pub fn new(config: &Config, keyboard: K, output: W, disk: D) -> Self {
        Self {
            terminal: Terminal::new(keyboard, output),
            cassette_in: CassetteReader::new(config.cassette.load_path.clone()),
            cassette_out: CassetteWriter::new(&config.cassette),
            disk: DiskProxy::new(disk),
            sense_switches: config.sense_switches,
        }
    }

    pub fn input(&mut self, port: u8) -> Result<u8, IoError> {
        let value = match port {
            PORT_UNUSED => 0,
            PORT_CONSOLE => self.terminal.poll_input(),
            PORT_CASSETTE_STATUS => self.cassette_in.status(),
            PORT_CASSETTE_DATA => self.cassette_in.read_data(),
            PORT_DISK_STATUS => self.disk.status(),
            PORT_DISK_SECTOR => self.disk.current_sector(),
            PORT_DISK_DATA => self.disk.read_byte(),
            PORT_SIO_STATUS => self.terminal.status(),
            PORT_SIO_DATA => self.terminal.read_data(),
            PORT_SENSE_SWITCHES => self.sense_switches,
            _ => {
                tracing::error!("[BUS] Read from unmapped port {:02X}", port);
                return Err(IoError::UnmappedPort {
                    direction: Direction::In,
                    port,
                });
            }
        };

        tracing::trace!("[BUS] [RD] [{:02X}] = {:02X}", port, value);
        Ok(value)
    }

    pub fn output(&mut self, port: u8, data: u8) -> Result<(), IoError> {
        tracing::trace!("[BUS] [WR] [{:02X}] <- {:02X}", port, data);

        match port {
            PORT_CONSOLE | PORT_SIO_DATA => self.terminal.write_data(data)?,
            PORT_CASSETTE_DATA => {
                self.cassette_out.write_data(data)?;
            }
            PORT_DISK_STATUS => self.disk.select(data),
            PORT_DISK_SECTOR => self.disk.function(data),
            PORT_DISK_DATA => self.disk.write_byte(data),
            PORT_SIO_STATUS => {
                tracing::trace!("[BUS] Ignored 2SIO control write {:02X}", data);
            }
            PORT_RESERVED => {
                tracing::trace!("[BUS] Ignored write to reserved port {:02X}", port);
            }
            _ => {
                tracing::error!("[BUS] Write to unmapped port {:02X} = {:02X}", port, data);
                return Err(IoError::UnmappedPort {
                    direction: Direction::Out,
                    port,
                });
            }
        }

        Ok(())
    }

    pub fn sense_switches(&self) -> u8 {
        self.sense_switches
    }

    pub fn set_sense_switches(&mut self, value: u8) {
        self.sense_switches = value;
    }
}

/// Port access as seen from the CPU's IN and OUT instructions.
pub trait PortIo {
    fn port_in(&mut self, port: u8) -> Result<u8, IoError>;
    fn port_out(&mut self, port: u8, value: u8) -> Result<(), IoError>;
}

impl<K: Keyboard, W: Write, D: DiskController> PortIo for Bus<K, W, D> {
    fn port_in(&mut self, port: u8) -> Result<u8, IoError> {
        self.input(port)
    }

    fn port_out(&mut self, port: u8, value: u8) -> Result<(), IoError> {
        self.output(port, value)
    }
}
