use super::memory::{Bus, MemoryError};
use super::registers::Registers;
use std::fmt;

pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressingModeResolution {
    pub opcode_address: u16,
    pub operands: Vec<u8>,
    pub addressing_mode: AddressingMode,
    pub target_address: Option<u16>,
    pub page_crossed: bool,
}

impl AddressingModeResolution {
    fn new(
        opcode_address: u16,
        operands: Vec<u8>,
        addressing_mode: AddressingMode,
        target_address: Option<u16>,
        page_crossed: bool,
    ) -> Self {
        AddressingModeResolution {
            opcode_address,
            operands,
            addressing_mode,
            target_address,
            page_crossed,
        }
    }
}

impl fmt::Display for AddressingModeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target_address {
            Some(addr) => write!(f, "{: <11}(#0x{:04X})", self.addressing_mode.name(), addr),
            None => write!(f, "{: <11}         ", self.addressing_mode.name()),
        }
    }
}

/// The 13 ways a 6502 instruction finds its operand.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageXIndexed,
    ZeroPageYIndexed,
    Absolute,
    AbsoluteXIndexed,
    AbsoluteYIndexed,
    Indirect,
    ZeroPageXIndexedIndirect,
    ZeroPageIndirectYIndexed,
    Relative,
}

impl AddressingMode {
    pub fn name(&self) -> &'static str {
        match *self {
            AddressingMode::Implied => "implied",
            AddressingMode::Accumulator => "accumulator",
            AddressingMode::Immediate => "immediate",
            AddressingMode::ZeroPage => "zeroPage",
            AddressingMode::ZeroPageXIndexed => "zeroPageX",
            AddressingMode::ZeroPageYIndexed => "zeroPageY",
            AddressingMode::Absolute => "absolute",
            AddressingMode::AbsoluteXIndexed => "absoluteX",
            AddressingMode::AbsoluteYIndexed => "absoluteY",
            AddressingMode::Indirect => "indirect",
            AddressingMode::ZeroPageXIndexedIndirect => "indirectX",
            AddressingMode::ZeroPageIndirectYIndexed => "indirectY",
            AddressingMode::Relative => "relative",
        }
    }

    /// Instruction length in bytes, opcode included.
    pub fn bytes(&self) -> u8 {
        match *self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteXIndexed
            | AddressingMode::AbsoluteYIndexed
            | AddressingMode::Indirect => 3,
            _ => 2,
        }
    }

    /*
     * solve
     * Compute the effective address of the operand. The command pointer is
     * expected to sit on the first operand byte, the opcode having already
     * been fetched. Nothing here moves the command pointer.
     */
    pub fn solve(&self, registers: &Registers, bus: &Bus) -> Result<AddressingModeResolution> {
        let pc = registers.command_pointer.get();
        let operands = bus.read_bytes(pc, self.bytes() as usize - 1)?;
        let x = registers.register_x.get();
        let y = registers.register_y.get();

        let (target_address, page_crossed) = match *self {
            AddressingMode::Implied | AddressingMode::Accumulator => (None, false),
            AddressingMode::Immediate => (Some(pc), false),
            AddressingMode::ZeroPage => (Some(operands[0] as u16), false),
            AddressingMode::ZeroPageXIndexed => (Some(operands[0].wrapping_add(x) as u16), false),
            AddressingMode::ZeroPageYIndexed => (Some(operands[0].wrapping_add(y) as u16), false),
            AddressingMode::Absolute => (Some(word(&operands)), false),
            AddressingMode::AbsoluteXIndexed => indexed(word(&operands), x),
            AddressingMode::AbsoluteYIndexed => indexed(word(&operands), y),
            AddressingMode::Indirect => {
                let pointer = word(&operands);
                // the high byte never crosses the pointer's page
                let high_address = (pointer & 0xff00) | (pointer.wrapping_add(1) & 0x00ff);
                let low = bus.read(pointer)?;
                let high = bus.read(high_address)?;

                (Some(u16::from_le_bytes([low, high])), false)
            }
            AddressingMode::ZeroPageXIndexedIndirect => {
                let pointer = operands[0].wrapping_add(x);

                (Some(zero_page_word(bus, pointer)?), false)
            }
            AddressingMode::ZeroPageIndirectYIndexed => {
                indexed(zero_page_word(bus, operands[0])?, y)
            }
            AddressingMode::Relative => {
                let next_instruction = pc.wrapping_add(1);
                let target = next_instruction.wrapping_add(operands[0] as i8 as u16);

                (Some(target), is_page_crossed(next_instruction, target))
            }
        };

        Ok(AddressingModeResolution::new(
            pc.wrapping_sub(1),
            operands,
            *self,
            target_address,
            page_crossed,
        ))
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn word(operands: &[u8]) -> u16 {
    u16::from_le_bytes([operands[0], operands[1]])
}

fn indexed(base: u16, index: u8) -> (Option<u16>, bool) {
    let target = base.wrapping_add(index as u16);

    (Some(target), is_page_crossed(base, target))
}

fn zero_page_word(bus: &Bus, pointer: u8) -> Result<u16> {
    let low = bus.read(pointer as u16)?;
    let high = bus.read(pointer.wrapping_add(1) as u16)?;

    Ok(u16::from_le_bytes([low, high]))
}

fn is_page_crossed(from: u16, to: u16) -> bool {
    from & 0xff00 != to & 0xff00
}
