use super::*;
use crate::registers::Register;

fn load(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    destination: fn(&mut Registers) -> &mut Register<u8>,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;
    let cycles = cpu_instruction.adjust_base_cycles(&resolution);

    let register = destination(registers);
    register.set(byte);
    let outcome = format!("[{}]", register);
    registers.update_nz_flags(byte);
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("{}[S={}]", outcome, registers.format_status()),
        cycles,
    ))
}

fn store(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    byte: u8,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let target_address = target_address(cpu_instruction, &resolution)?;
    bus.write(target_address, byte)?;
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("0x{:02x}", byte),
        cpu_instruction.cycles,
    ))
}

/// # LDA - Load accumulator
pub fn lda(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    load(bus, registers, cpu_instruction, |r| &mut r.accumulator)
}

/// # LDX - Load X register
pub fn ldx(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    load(bus, registers, cpu_instruction, |r| &mut r.register_x)
}

/// # LDY - Load Y register
pub fn ldy(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    load(bus, registers, cpu_instruction, |r| &mut r.register_y)
}

/// # STA - Store accumulator
/// Stores never pay the page crossing penalty, the indexed modes already
/// take it in their base cycles.
pub fn sta(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let byte = registers.accumulator.get();
    store(bus, registers, cpu_instruction, byte)
}

/// # STX - Store X register
pub fn stx(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let byte = registers.register_x.get();
    store(bus, registers, cpu_instruction, byte)
}

/// # STY - Store Y register
pub fn sty(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let byte = registers.register_y.get();
    store(bus, registers, cpu_instruction, byte)
}
