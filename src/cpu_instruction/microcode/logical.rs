use super::*;

fn accumulator_operation(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    operation: fn(u8, u8) -> u8,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;
    let cycles = cpu_instruction.adjust_base_cycles(&resolution);

    let result = operation(registers.accumulator.get(), byte);
    registers.accumulator.set(result);
    registers.update_nz_flags(result);
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "(0x{:02x})[A=0x{:02x}][S={}]",
            byte,
            result,
            registers.format_status()
        ),
        cycles,
    ))
}

/// # AND - Logical AND with the accumulator
pub fn and(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    accumulator_operation(bus, registers, cpu_instruction, |a, b| a & b)
}

/// # EOR - Exclusive OR with the accumulator
pub fn eor(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    accumulator_operation(bus, registers, cpu_instruction, |a, b| a ^ b)
}

/// # ORA - Inclusive OR with the accumulator
pub fn ora(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    accumulator_operation(bus, registers, cpu_instruction, |a, b| a | b)
}

/// # BIT - Bit test
///
/// Z from A & M, N and V are copied from bits 7 and 6 of the operand.
/// The accumulator is left untouched.
pub fn bit(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;

    registers.set_z_flag(registers.accumulator.get() & byte == 0);
    registers.set_n_flag(byte & 0x80 != 0);
    registers.set_v_flag(byte & 0x40 != 0);
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("(0x{:02x})[S={}]", byte, registers.format_status()),
        cpu_instruction.cycles,
    ))
}
