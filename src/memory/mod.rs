mod bus;
mod error;
mod ram;
mod rom;

pub use bus::{Bus, ComponentInfo};
pub use error::MemoryError;
pub use ram::RAM;
pub use rom::ROM;

pub const MEMMAX: usize = 65535;

pub type Result<T> = std::result::Result<T, MemoryError>;

pub fn little_endian(bytes: &[u8]) -> u16 {
    let mut addr: u16 = 0;

    for byte in bytes.iter().rev() {
        addr = addr << 8 | (*byte as u16);
    }

    addr
}

/*
 * AddressableIO
 * this trait defines the interface for every component the bus can route
 * reads and writes to. Components receive absolute bus addresses.
 */
pub trait AddressableIO: Send {
    fn read(&self, addr: u16) -> Result<u8>;
    fn write(&mut self, addr: u16, value: u8) -> Result<()>;

    /// Power-on reset signal forwarded by the bus. Most components ignore it.
    fn reset(&mut self) {}
}
