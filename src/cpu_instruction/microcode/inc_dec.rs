use super::*;
use crate::registers::Register;

fn step_memory(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    operation: fn(u8) -> u8,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let target_address = target_address(cpu_instruction, &resolution)?;
    let result = operation(bus.read(target_address)?);
    bus.write(target_address, result)?;
    registers.update_nz_flags(result);
    registers.skip_operands(cpu_instruction.bytes());

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("0x{:02x}[S={}]", result, registers.format_status()),
        cpu_instruction.cycles,
    ))
}

fn step_register(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    register: fn(&mut Registers) -> &mut Register<u8>,
    increment: bool,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let register = register(registers);
    let result = if increment {
        register.increment(1)
    } else {
        register.decrement(1)
    };
    let outcome = format!("[{}]", register);
    registers.update_nz_flags(result);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("{}[S={}]", outcome, registers.format_status()),
        cpu_instruction.cycles,
    ))
}

/// # INC - Increment memory
pub fn inc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_memory(bus, registers, cpu_instruction, |byte| byte.wrapping_add(1))
}

/// # DEC - Decrement memory
pub fn dec(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_memory(bus, registers, cpu_instruction, |byte| byte.wrapping_sub(1))
}

/// # INX - Increment X register
pub fn inx(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_register(bus, registers, cpu_instruction, |r| &mut r.register_x, true)
}

/// # INY - Increment Y register
pub fn iny(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_register(bus, registers, cpu_instruction, |r| &mut r.register_y, true)
}

/// # DEX - Decrement X register
pub fn dex(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_register(bus, registers, cpu_instruction, |r| &mut r.register_x, false)
}

/// # DEY - Decrement Y register
pub fn dey(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    step_register(bus, registers, cpu_instruction, |r| &mut r.register_y, false)
}
