mod cpu_instruction;
mod instruction_set;
pub mod microcode;

pub const INIT_VECTOR_ADDR: u16 = 0xfffc;
pub const NMI_VECTOR_ADDR: u16 = 0xfffa;
pub const INTERRUPT_VECTOR_ADDR: u16 = 0xfffe;

pub use cpu_instruction::{CPUInstruction, InstructionInfo, LogLine, Mnemonic};
pub use instruction_set::{InstructionSet, InstructionSetError};
pub use microcode::MicrocodeError;
