use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Add,
    Subtract,
}

/// Nibble per nibble BCD addition or subtraction.
///
/// `carry` is the carry flag as ADC and SBC see it: a carry in for
/// additions, the absence of borrow for subtractions. The returned flag has
/// the same meaning for the outgoing carry.
/// See http://www.6502.org/tutorials/decimal_mode.html
fn decimal(a: u8, b: u8, carry: bool, direction: Direction) -> (u8, bool) {
    let (a_low, a_high) = ((a & 0x0f) as i16, (a >> 4) as i16);
    let (b_low, b_high) = ((b & 0x0f) as i16, (b >> 4) as i16);

    match direction {
        Direction::Add => {
            let mut low = a_low + b_low + carry as i16;
            let carry_low = low > 9;
            if carry_low {
                low = (low + 6) & 0x0f;
            }
            let mut high = a_high + b_high + carry_low as i16;
            let carry_high = high > 9;
            if carry_high {
                high = (high + 6) & 0x0f;
            }

            (((high << 4) | low) as u8, carry_high)
        }
        Direction::Subtract => {
            let mut low = a_low - b_low - (!carry) as i16;
            let borrow_low = low < 0;
            if borrow_low {
                low = (low - 6) & 0x0f;
            }
            let mut high = a_high - b_high - borrow_low as i16;
            let borrow_high = high < 0;
            if borrow_high {
                high = (high - 6) & 0x0f;
            }

            (((high << 4) | low) as u8, !borrow_high)
        }
    }
}

/// # ADC - Add with carry
///
/// Binary mode: C is set when the raw sum does not fit in 8 bits, V when
/// both operands share a sign the result does not have.
/// Decimal mode: N and Z come from the adjusted result, V from the binary
/// rule.
pub fn adc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;
    let cycles = cpu_instruction.adjust_base_cycles(&resolution);

    let a = registers.accumulator.get();
    let carry = registers.c_flag_is_set();
    let raw = a as u16 + byte as u16 + carry as u16;
    registers.status.update_overflow_flag(a, byte, raw as u8);

    let result = if registers.d_flag_is_set() {
        let (result, carry) = decimal(a, byte, carry, Direction::Add);
        registers.set_c_flag(carry);
        result
    } else {
        registers.status.update_carry_flag(raw);
        raw as u8
    };
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

/// # SBC - Subtract with carry
///
/// Computes A - M - (1 - C). C is set when no borrow was needed.
pub fn sbc(
    bus: &mut Bus,
    registers: &mut Registers,
    cpu_instruction: &CPUInstruction,
) -> Result<LogLine> {
    let resolution = cpu_instruction.addressing_mode.solve(registers, bus)?;
    let byte = read_operand(bus, cpu_instruction, &resolution)?;
    let cycles = cpu_instruction.adjust_base_cycles(&resolution);

    let a = registers.accumulator.get();
    let carry = registers.c_flag_is_set();
    let raw = a as i16 - byte as i16 - (!carry) as i16;
    registers.status.update_overflow_flag(a, !byte, raw as u8);

    let result = if registers.d_flag_is_set() {
        let (result, carry) = decimal(a, byte, carry, Direction::Subtract);
        registers.set_c_flag(carry);
        result
    } else {
        registers.set_c_flag(raw >= 0);
        raw as u8
    };
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
