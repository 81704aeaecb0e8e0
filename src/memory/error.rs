use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq, Hash)]
pub enum MemoryError {
    #[error("address 0x{0:04X} is not mapped to any component")]
    Unmapped(u16),
    #[error("trying to write in a read-only memory at address 0x{0:04X}")]
    ReadOnly(u16),
    #[error("invalid address range: start 0x{start:04X} is after end 0x{end:04X}")]
    InvalidRange { start: u16, end: u16 },
    #[error("address conflict: 0x{address:04X} is already mapped to component '{id}'")]
    Conflict { address: u16, id: String },
    #[error("no component '{0}' is connected to the bus")]
    UnknownComponent(String),
}
