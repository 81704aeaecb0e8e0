use super::*;

/// # JMP - Jump
pub fn jmp(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let target_address = target_address(cpu_instruction, &resolution)?;
    registers.command_pointer.set(target_address);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("[CP=0x{:04X}]", target_address),
        cpu_instruction.cycles,
    ))
}

/// # JSR - Jump to subroutine
///
/// The pushed return address is the one of the last byte of the JSR
/// instruction, RTS adds one when pulling it back.
pub fn jsr(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let target_address = target_address(cpu_instruction, &resolution)?;

    let return_address = registers.command_pointer.get().wrapping_add(1);
    registers.stack_push_word(bus, return_address)?;
    registers.command_pointer.set(target_address);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[CP=0x{:04X}][SP=0x{:02x}]",
            target_address,
            registers.stack_pointer.get()
        ),
        cpu_instruction.cycles,
    ))
}

/// # RTS - Return from subroutine
pub fn rts(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let return_address = registers.stack_pull_word(bus)?.wrapping_add(1);
    registers.command_pointer.set(return_address);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[CP=0x{:04X}][SP=0x{:02x}]",
            return_address,
            registers.stack_pointer.get()
        ),
        cpu_instruction.cycles,
    ))
}
