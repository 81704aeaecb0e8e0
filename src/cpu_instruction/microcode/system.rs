use super::*;
use crate::cpu_instruction::INTERRUPT_VECTOR_ADDR;

/// # BRK - Software interrupt
///
/// Pushes the address of the byte following the padding byte, then the
/// status with B and the unused bit set, disables interrupts and jumps
/// through the IRQ vector.
pub fn brk(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let return_address = registers.command_pointer.get().wrapping_add(1);
    registers.stack_push_word(bus, return_address)?;
    let status = registers.status.get() | StatusRegister::BREAK | StatusRegister::UNUSED;
    registers.stack_push(bus, status)?;
    registers.set_i_flag(true);
    let target_address = bus.read_word(INTERRUPT_VECTOR_ADDR)?;
    registers.command_pointer.set(target_address);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[CP=0x{:04X}][SP=0x{:02x}][S={}]",
            target_address,
            registers.stack_pointer.get(),
            registers.format_status()
        ),
        cpu_instruction.cycles,
    ))
}

/// # RTI - Return from interrupt
///
/// The command pointer is pulled as is, unlike RTS there is no increment.
pub fn rti(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let status = registers.stack_pull(bus)?;
    registers.status.set(status & !StatusRegister::BREAK);
    let return_address = registers.stack_pull_word(bus)?;
    registers.command_pointer.set(return_address);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[CP=0x{:04X}][SP=0x{:02x}][S={}]",
            return_address,
            registers.stack_pointer.get(),
            registers.format_status()
        ),
        cpu_instruction.cycles,
    ))
}

/// # NOP - No operation
pub fn nop(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        String::new(),
        cpu_instruction.cycles,
    ))
}
