use super::*;

fn set_flag(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    flag: u8,
    value: bool,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    registers.status.set_flag(flag, value);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("[S={}]", registers.format_status()),
        cpu_instruction.cycles,
    ))
}

/// # CLC - Clear carry flag
pub fn clc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::CARRY, false)
}

/// # CLD - Clear decimal mode
pub fn cld(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::DECIMAL, false)
}

/// # CLI - Clear interrupt disable
pub fn cli(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::INTERRUPT, false)
}

/// # CLV - Clear overflow flag
pub fn clv(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::OVERFLOW, false)
}

/// # SEC - Set carry flag
pub fn sec(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::CARRY, true)
}

/// # SED - Set decimal mode
pub fn sed(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::DECIMAL, true)
}

/// # SEI - Set interrupt disable
pub fn sei(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    set_flag(bus, registers, cpu_instruction, StatusRegister::INTERRUPT, true)
}
