use super::*;

fn compare(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    register: u8,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;
    let cycles = cpu_instruction.adjust_base_cycles(&resolution);

    registers.set_c_flag(register >= byte);
    registers.update_nz_flags(register.wrapping_sub(byte));
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("(0x{:02x})[S={}]", byte, registers.format_status()),
        cycles,
    ))
}

/// # CMP - Compare the accumulator with memory
pub fn cmp(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let register = registers.accumulator.get();
    compare(bus, registers, cpu_instruction, register)
}

/// # CPX - Compare the X register with memory
pub fn cpx(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let register = registers.register_x.get();
    compare(bus, registers, cpu_instruction, register)
}

/// # CPY - Compare the Y register with memory
pub fn cpy(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let register = registers.register_y.get();
    compare(bus, registers, cpu_instruction, register)
}
