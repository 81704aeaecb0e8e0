use super::*;

/// Read-only component holding `data` from `base` upward.
pub struct ROM {
    base: u16,
    rom: Vec<u8>,
}

impl ROM {
    pub fn new(base: u16, data: Vec<u8>) -> ROM {
        ROM { base, rom: data }
    }

    pub fn len(&self) -> usize {
        self.rom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rom.is_empty()
    }
}

impl AddressableIO for ROM {
    fn read(&self, addr: u16) -> Result<u8> {
        self.rom
            .get(addr.wrapping_sub(self.base) as usize)
            .copied()
            .ok_or(MemoryError::Unmapped(addr))
    }

    fn write(&mut self, addr: u16, _value: u8) -> Result<()> {
        Err(MemoryError::ReadOnly(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read() {
        let rom = ROM::new(0xfffc, vec![0x00, 0x04, 0x10, 0x20]);
        assert_eq!(0x00, rom.read(0xfffc).unwrap());
        assert_eq!(0x20, rom.read(0xffff).unwrap());
        assert_eq!(Err(MemoryError::Unmapped(0x0000)), rom.read(0x0000));
    }

    #[test]
    fn test_write_is_refused() {
        let mut rom = ROM::new(0xc000, vec![0xea; 16]);
        assert_eq!(Err(MemoryError::ReadOnly(0xc001)), rom.write(0xc001, 0x00));
        assert_eq!(0xea, rom.read(0xc001).unwrap());
    }
}
