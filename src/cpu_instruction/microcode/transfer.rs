use super::*;
use crate::registers::RegisterName;

fn transfer(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    source: RegisterName,
    destination: RegisterName,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let value = registers.get(source) as u8;
    registers.set(destination, value as u16);

    // TXS is the only transfer leaving the flags alone
    if destination != RegisterName::SP {
        registers.update_nz_flags(value);
    }

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("(0x{:02x})[S={}]", value, registers.format_status()),
        cpu_instruction.cycles,
    ))
}

/// # TAX - Transfer accumulator to X
pub fn tax(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::A, RegisterName::X)
}

/// # TAY - Transfer accumulator to Y
pub fn tay(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::A, RegisterName::Y)
}

/// # TSX - Transfer stack pointer to X
pub fn tsx(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::SP, RegisterName::X)
}

/// # TXA - Transfer X to accumulator
pub fn txa(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::X, RegisterName::A)
}

/// # TXS - Transfer X to stack pointer
pub fn txs(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::X, RegisterName::SP)
}

/// # TYA - Transfer Y to accumulator
pub fn tya(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    transfer(bus, registers, cpu_instruction, RegisterName::Y, RegisterName::A)
}
