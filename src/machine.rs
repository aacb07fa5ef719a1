use std::{fs, io::Write, path::Path};

use anyhow::bail;

use crate::{
    bus::{Bus, PortIo},
    disk::DiskController,
    error::{Fault, IoError},
    keyboard::Keyboard,
    utils::partial_hexdump,
};

/// Size of the region cleared before a BASIC ROM is copied in.
pub const ROM_AREA: usize = 0x4000;

/// The processor side of the machine. The interpreter calls back into the
/// bus for every IN and OUT it executes.
pub trait Cpu {
    fn pc(&self) -> u16;
    fn jump(&mut self, address: u16);
    fn memory_mut(&mut self) -> &mut [u8];

    /// Executes one instruction, returning the cycles it took.
    fn step(&mut self, io: &mut dyn PortIo) -> Result<u32, IoError>;
}

pub struct Machine<C, K, W, D> {
    pub cpu: C,
    pub bus: Bus<K, W, D>,
    pub cycles: usize,
    pub instructions: usize,
}

impl<C, K, W, D> Machine<C, K, W, D>
where
    C: Cpu,
    K: Keyboard,
    W: Write,
    D: DiskController,
{
    pub fn new(cpu: C, bus: Bus<K, W, D>) -> Self {
        Self {
            cpu,
            bus,
            cycles: 0,
            instructions: 0,
        }
    }

    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    pub fn step(&mut self) -> Result<u32, Fault> {
        match self.cpu.step(&mut self.bus) {
            Ok(cycles) => {
                self.cycles += cycles as usize;
                self.instructions += 1;
                Ok(cycles)
            }
            Err(error) => {
                let fault = Fault {
                    pc: self.cpu.pc(),
                    error,
                };
                tracing::error!("[Machine] {}", fault);
                Err(fault)
            }
        }
    }

    pub fn step_for(&mut self, n: usize) -> Result<(), Fault> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Runs until the first fault and hands it back to the caller.
    pub fn run(&mut self) -> Fault {
        loop {
            if let Err(fault) = self.step() {
                return fault;
            }
        }
    }

    /// Clears the ROM area, copies `rom` to address 0 and jumps there.
    pub fn load_rom(&mut self, rom: &[u8]) -> anyhow::Result<()> {
        let memory = self.cpu.memory_mut();
        if rom.len() > memory.len() {
            bail!(
                "ROM of {} bytes does not fit in {} bytes of memory",
                rom.len(),
                memory.len()
            );
        }

        let clear = ROM_AREA.min(memory.len());
        memory[..clear].fill(0);
        memory[..rom.len()].copy_from_slice(rom);
        self.cpu.jump(0x0000);

        tracing::info!("[Machine] Loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Copies a file into memory at `offset`. The entry point is left alone.
    pub fn load_mem_file(&mut self, path: impl AsRef<Path>, offset: usize) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let data = fs::read(path)?;

        let memory = self.cpu.memory_mut();
        let Some(end) = offset.checked_add(data.len()).filter(|&end| end <= memory.len()) else {
            bail!(
                "{} ({} bytes) does not fit in memory at {:#06x}",
                path.display(),
                data.len(),
                offset
            );
        };

        memory[offset..end].copy_from_slice(&data);
        tracing::info!(
            "[Machine] Loaded {} at {:#06x} ({} bytes)",
            path.display(),
            offset,
            data.len()
        );
        Ok(data.len())
    }

    pub fn jump(&mut self, address: u16) {
        self.cpu.jump(address);
    }

    pub fn memory_dump(&mut self, start: usize, end: usize) -> String {
        partial_hexdump(self.cpu.memory_mut(), start, end)
    }
}
