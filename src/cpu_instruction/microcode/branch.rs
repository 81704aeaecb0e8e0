use super::*;

/*
 * All conditional branches share this template: the predicate is evaluated
 * against the status register. A branch not taken just steps over the
 * offset byte. A taken branch costs one more cycle, two when the target
 * lies in another page than the next instruction.
 */
fn branch(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
    flag: u8,
    expected: bool,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let target_address = target_address(cpu_instruction, &resolution)?;
    let taken = registers.status.flag(flag) == expected;

    registers.skip_operands(cpu_instruction.bytes());
    if taken {
        registers.command_pointer.set(target_address);
    }
    let cycles = cpu_instruction.branch_cycles(taken, &resolution);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("[CP=0x{:04X}]", registers.command_pointer.get()),
        cycles,
    ))
}

/// # BCC - Branch if carry clear
pub fn bcc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::CARRY, false)
}

/// # BCS - Branch if carry set
pub fn bcs(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::CARRY, true)
}

/// # BEQ - Branch if equal (Z set)
pub fn beq(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::ZERO, true)
}

/// # BNE - Branch if not equal (Z clear)
pub fn bne(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::ZERO, false)
}

/// # BMI - Branch if minus (N set)
pub fn bmi(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::NEGATIVE, true)
}

/// # BPL - Branch if plus (N clear)
pub fn bpl(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::NEGATIVE, false)
}

/// # BVC - Branch if overflow clear
pub fn bvc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::OVERFLOW, false)
}

/// # BVS - Branch if overflow set
pub fn bvs(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    branch(bus, registers, cpu_instruction, StatusRegister::OVERFLOW, true)
}
