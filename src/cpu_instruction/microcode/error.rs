use crate::addressing_mode::AddressingMode;
use crate::cpu_instruction::Mnemonic;
use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MicrocodeError {
    #[error("memory error during microcode operation: {0}")]
    Memory(#[from] MemoryError),
    // ↓ an instruction needs an operand its addressing mode does not give
    #[error("{mnemonic} has no operand in {addressing_mode} addressing mode")]
    NoOperand {
        mnemonic: Mnemonic,
        addressing_mode: AddressingMode,
    },
}

pub type Result<T> = std::result::Result<T, MicrocodeError>;
