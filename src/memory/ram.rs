use super::*;
use std::cell::Cell;
use std::fmt;

/// Dense 64 KiB memory, zeroed on creation and on reset.
///
/// Addresses are taken modulo 65536 so a RAM mapped over any window of the
/// bus keeps using the same cell for the same bus address.
pub struct RAM {
    ram: Box<[u8; MEMMAX + 1]>,
    access_count: Cell<u64>,
}

impl Default for RAM {
    fn default() -> Self {
        Self {
            ram: Box::new([0x00; MEMMAX + 1]),
            access_count: Cell::new(0),
        }
    }
}

impl RAM {
    /// Copy `data` starting at `address`, wrapping past 0xFFFF.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        let mut addr = address;
        for byte in data {
            self.ram[addr as usize] = *byte;
            addr = addr.wrapping_add(1);
        }
    }

    pub fn dump(&self, start: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|offset| self.ram[start.wrapping_add(offset as u16) as usize])
            .collect()
    }

    /// Number of reads and writes served since creation or last reset.
    pub fn access_count(&self) -> u64 {
        self.access_count.get()
    }

    fn count_access(&self) {
        self.access_count.set(self.access_count.get() + 1);
    }
}

impl AddressableIO for RAM {
    fn read(&self, addr: u16) -> Result<u8> {
        self.count_access();
        Ok(self.ram[addr as usize])
    }

    fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        self.count_access();
        self.ram[addr as usize] = value;

        Ok(())
    }

    fn reset(&mut self) {
        self.ram.iter_mut().for_each(|byte| *byte = 0x00);
        self.access_count.set(0);
    }
}

impl fmt::Debug for RAM {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RAM {{ size: {}, accesses: {} }}", MEMMAX + 1, self.access_count())
    }
}
