use super::*;

/*
 * Shifts and rotations work on the accumulator when the addressing mode is
 * Accumulator and on a memory cell otherwise. The operation receives the
 * byte and the current carry and returns the new byte and the new carry.
 */
fn read_modify_write(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    operation: fn(u8, bool) -> (u8, bool),
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;

    let outcome = if cpu_instruction.addressing_mode == AddressingMode::Accumulator {
        let (result, carry) = operation(registers.accumulator.get(), registers.c_flag_is_set());
        registers.accumulator.set(result);
        registers.set_c_flag(carry);
        registers.update_nz_flags(result);
        format!("[A=0x{:02x}][S={}]", result, registers.format_status())
    } else {
        let target_address = target_address(cpu_instruction, &resolution)?;
        let byte = bus.read(target_address)?;
        let (result, carry) = operation(byte, registers.c_flag_is_set());
        bus.write(target_address, result)?;
        registers.set_c_flag(carry);
        registers.update_nz_flags(result);
        format!("0x{:02x}[S={}]", result, registers.format_status())
    };
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        outcome,
        cpu_instruction.cycles,
    ))
}

/// # ASL - Arithmetic shift left
pub fn asl(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    read_modify_write(bus, registers, cpu_instruction, |byte, _| {
        (byte << 1, byte & 0x80 != 0)
    })
}

/// # LSR - Logical shift right
pub fn lsr(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    read_modify_write(bus, registers, cpu_instruction, |byte, _| {
        (byte >> 1, byte & 0x01 != 0)
    })
}

/// # ROL - Rotate left through carry
pub fn rol(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    read_modify_write(bus, registers, cpu_instruction, |byte, carry| {
        (byte << 1 | carry as u8, byte & 0x80 != 0)
    })
}

/// # ROR - Rotate right through carry
pub fn ror(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    read_modify_write(bus, registers, cpu_instruction, |byte, carry| {
        (byte >> 1 | (carry as u8) << 7, byte & 0x01 != 0)
    })
}
