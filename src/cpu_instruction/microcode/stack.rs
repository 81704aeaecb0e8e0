use super::*;

/// # PHA - Push accumulator
pub fn pha(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = registers.accumulator.get();
    registers.stack_push(bus, byte)?;

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("[SP=0x{:02x}]", registers.stack_pointer.get()),
        cpu_instruction.cycles,
    ))
}

/// # PHP - Push processor status
///
/// The pushed copy always has B and the unused bit set.
pub fn php(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = registers.status.get() | StatusRegister::BREAK | StatusRegister::UNUSED;
    registers.stack_push(bus, byte)?;

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!("[SP=0x{:02x}]", registers.stack_pointer.get()),
        cpu_instruction.cycles,
    ))
}

/// # PLA - Pull accumulator
pub fn pla(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = registers.stack_pull(bus)?;
    registers.accumulator.set(byte);
    registers.update_nz_flags(byte);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[A=0x{:02x}][SP=0x{:02x}][S={}]",
            byte,
            registers.stack_pointer.get(),
            registers.format_status()
        ),
        cpu_instruction.cycles,
    ))
}

/// # PLP - Pull processor status
///
/// The live B flag keeps its value whatever the pulled byte says.
pub fn plp(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = registers.stack_pull(bus)?;
    let break_flag = registers.status.get() & StatusRegister::BREAK;
    registers
        .status
        .set((byte & !StatusRegister::BREAK) | break_flag);

    Ok(LogLine::new(
        cpu_instruction,
        resolution,
        format!(
            "[SP=0x{:02x}][S={}]",
            registers.stack_pointer.get(),
            registers.format_status()
        ),
        cpu_instruction.cycles,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu_instruction::cpu_instruction::tests::{get_stuff, instruction};

    #[test]
    fn test_pha_pla() {
        let (mut bus, mut registers) = get_stuff(0x1000, &[0x48, 0x68]);
        registers.accumulator.set(0x80);
        let log_line = instruction(0x48).execute(&mut bus, &mut registers).unwrap();
        assert_eq!(0x80, bus.read(0x01fd).unwrap());
        assert_eq!(0xfc, registers.stack_pointer.get());
        assert_eq!(3, log_line.cycles);
        assert_eq!(0x1001, registers.command_pointer.get());

        registers.accumulator.set(0x00);
        registers.command_pointer.increment(1);
        let log_line = instruction(0x68).execute(&mut bus, &mut registers).unwrap();
        assert_eq!(0x80, registers.accumulator.get());
        assert!(registers.n_flag_is_set());
        assert!(!registers.z_flag_is_set());
        assert_eq!(0xfd, registers.stack_pointer.get());
        assert_eq!(4, log_line.cycles);
    }

    #[test]
    fn test_php_forces_break_and_unused() {
        let (mut bus, mut registers) = get_stuff(0x1000, &[0x08]);
        registers.set_c_flag(true);
        instruction(0x08).execute(&mut bus, &mut registers).unwrap();
        assert_eq!(0x35, bus.read(0x01fd).unwrap());
        assert!(!registers.b_flag_is_set());
    }

    #[test]
    fn test_plp_keeps_break_flag() {
        let (mut bus, mut registers) = get_stuff(0x1000, &[0x28]);
        registers.stack_pointer.set(0xfc);
        bus.write(0x01fd, 0xdb).unwrap();
        let log_line = instruction(0x28).execute(&mut bus, &mut registers).unwrap();
        // 0xdb = NV-B D ZC, the B bit is dropped and unused forced
        assert_eq!(0xeb, registers.status.get());
        assert!(!registers.b_flag_is_set());
        assert!(registers.n_flag_is_set());
        assert!(registers.v_flag_is_set());
        assert!(registers.d_flag_is_set());
        assert!(!registers.i_flag_is_set());
        assert_eq!(0xfd, registers.stack_pointer.get());
        assert_eq!("[SP=0xfd][S=NV-bDiZC]", log_line.outcome);
    }

    #[test]
    fn test_plp_forces_unused() {
        let (mut bus, mut registers) = get_stuff(0x1000, &[0x28]);
        registers.stack_pointer.set(0xfc);
        registers.set_b_flag(true);
        bus.write(0x01fd, 0x00).unwrap();
        instruction(0x28).execute(&mut bus, &mut registers).unwrap();
        assert_eq!(0x30, registers.status.get());
    }
}
