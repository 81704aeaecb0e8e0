mod addressing_mode;
mod cpu_instruction;
mod disassembler;
pub mod memory;
mod processing_unit;
mod registers;

pub const VERSION: &str = "0.1.0";

pub use addressing_mode::{AddressingMode, AddressingModeResolution};
pub use cpu_instruction::{
    microcode, CPUInstruction, InstructionInfo, InstructionSet, InstructionSetError, LogLine,
    MicrocodeError, Mnemonic, INIT_VECTOR_ADDR, INTERRUPT_VECTOR_ADDR, NMI_VECTOR_ADDR,
};
pub use disassembler::{DisassembledLine, Disassembler, FormatOptions, Instructions};
pub use memory::{AddressableIO, Bus, MemoryError, RAM, ROM};
pub use processing_unit::{
    Cpu, CpuConfig, CpuError, InterruptLines, UnknownOpcodePolicy,
};
pub use registers::{
    Register, RegisterName, Registers, StatusRegister, STACK_BASE_ADDR, STACK_POINTER_INIT,
};

/// Build a processor over a full RAM bus holding `program` at `address`,
/// with the reset vector pointing at it.
pub fn load_program(address: u16, program: &[u8], config: CpuConfig) -> Result<Cpu, CpuError> {
    let mut bus = Bus::with_ram();
    bus.write_bytes(address, program)?;
    bus.write_word(INIT_VECTOR_ADDR, address)?;

    Cpu::with_config(bus, config)
}
