use super::cpu_instruction::{CPUInstruction, InstructionInfo, Mnemonic};
use crate::addressing_mode::AddressingMode;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InstructionSetError {
    #[error("opcode 0x{0:02X} is already registered")]
    DuplicateOpcode(u8),
}

impl Mnemonic {
    pub fn description(&self) -> &'static str {
        match *self {
            Mnemonic::ADC => "Add with Carry",
            Mnemonic::AND => "Logical AND",
            Mnemonic::ASL => "Arithmetic Shift Left",
            Mnemonic::BCC => "Branch if Carry Clear",
            Mnemonic::BCS => "Branch if Carry Set",
            Mnemonic::BEQ => "Branch if Equal",
            Mnemonic::BIT => "Bit Test",
            Mnemonic::BMI => "Branch if Minus",
            Mnemonic::BNE => "Branch if Not Equal",
            Mnemonic::BPL => "Branch if Positive",
            Mnemonic::BRK => "Force Interrupt",
            Mnemonic::BVC => "Branch if Overflow Clear",
            Mnemonic::BVS => "Branch if Overflow Set",
            Mnemonic::CLC => "Clear Carry Flag",
            Mnemonic::CLD => "Clear Decimal Mode",
            Mnemonic::CLI => "Clear Interrupt Disable",
            Mnemonic::CLV => "Clear Overflow Flag",
            Mnemonic::CMP => "Compare Accumulator",
            Mnemonic::CPX => "Compare X Register",
            Mnemonic::CPY => "Compare Y Register",
            Mnemonic::DEC => "Decrement Memory",
            Mnemonic::DEX => "Decrement X Register",
            Mnemonic::DEY => "Decrement Y Register",
            Mnemonic::EOR => "Exclusive OR",
            Mnemonic::INC => "Increment Memory",
            Mnemonic::INX => "Increment X Register",
            Mnemonic::INY => "Increment Y Register",
            Mnemonic::JMP => "Jump",
            Mnemonic::JSR => "Jump to Subroutine",
            Mnemonic::LDA => "Load Accumulator",
            Mnemonic::LDX => "Load X Register",
            Mnemonic::LDY => "Load Y Register",
            Mnemonic::LSR => "Logical Shift Right",
            Mnemonic::NOP => "No Operation",
            Mnemonic::ORA => "Logical Inclusive OR",
            Mnemonic::PHA => "Push Accumulator",
            Mnemonic::PHP => "Push Processor Status",
            Mnemonic::PLA => "Pull Accumulator",
            Mnemonic::PLP => "Pull Processor Status",
            Mnemonic::ROL => "Rotate Left",
            Mnemonic::ROR => "Rotate Right",
            Mnemonic::RTI => "Return from Interrupt",
            Mnemonic::RTS => "Return from Subroutine",
            Mnemonic::SBC => "Subtract with Carry",
            Mnemonic::SEC => "Set Carry Flag",
            Mnemonic::SED => "Set Decimal Flag",
            Mnemonic::SEI => "Set Interrupt Disable",
            Mnemonic::STA => "Store Accumulator",
            Mnemonic::STX => "Store X Register",
            Mnemonic::STY => "Store Y Register",
            Mnemonic::TAX => "Transfer Accumulator to X",
            Mnemonic::TAY => "Transfer Accumulator to Y",
            Mnemonic::TSX => "Transfer Stack Pointer to X",
            Mnemonic::TXA => "Transfer X to Accumulator",
            Mnemonic::TXS => "Transfer X to Stack Pointer",
            Mnemonic::TYA => "Transfer Y to Accumulator",
        }
    }
}

use AddressingMode::*;
use Mnemonic::*;

/*
 * Documented NMOS 6502 opcodes.
 * (opcode, mnemonic, addressing mode, base cycles, page crossing penalty)
 */
#[rustfmt::skip]
const OPCODES: [(u8, Mnemonic, AddressingMode, u8, bool); 151] = [
    (0x69, ADC, Immediate, 2, false),
    (0x65, ADC, ZeroPage, 3, false),
    (0x75, ADC, ZeroPageXIndexed, 4, false),
    (0x6d, ADC, Absolute, 4, false),
    (0x7d, ADC, AbsoluteXIndexed, 4, true),
    (0x79, ADC, AbsoluteYIndexed, 4, true),
    (0x61, ADC, ZeroPageXIndexedIndirect, 6, false),
    (0x71, ADC, ZeroPageIndirectYIndexed, 5, true),
    (0x29, AND, Immediate, 2, false),
    (0x25, AND, ZeroPage, 3, false),
    (0x35, AND, ZeroPageXIndexed, 4, false),
    (0x2d, AND, Absolute, 4, false),
    (0x3d, AND, AbsoluteXIndexed, 4, true),
    (0x39, AND, AbsoluteYIndexed, 4, true),
    (0x21, AND, ZeroPageXIndexedIndirect, 6, false),
    (0x31, AND, ZeroPageIndirectYIndexed, 5, true),
    (0x0a, ASL, Accumulator, 2, false),
    (0x06, ASL, ZeroPage, 5, false),
    (0x16, ASL, ZeroPageXIndexed, 6, false),
    (0x0e, ASL, Absolute, 6, false),
    (0x1e, ASL, AbsoluteXIndexed, 7, false),
    (0x90, BCC, Relative, 2, false),
    (0xb0, BCS, Relative, 2, false),
    (0xf0, BEQ, Relative, 2, false),
    (0x24, BIT, ZeroPage, 3, false),
    (0x2c, BIT, Absolute, 4, false),
    (0x30, BMI, Relative, 2, false),
    (0xd0, BNE, Relative, 2, false),
    (0x10, BPL, Relative, 2, false),
    (0x00, BRK, Implied, 7, false),
    (0x50, BVC, Relative, 2, false),
    (0x70, BVS, Relative, 2, false),
    (0x18, CLC, Implied, 2, false),
    (0xd8, CLD, Implied, 2, false),
    (0x58, CLI, Implied, 2, false),
    (0xb8, CLV, Implied, 2, false),
    (0xc9, CMP, Immediate, 2, false),
    (0xc5, CMP, ZeroPage, 3, false),
    (0xd5, CMP, ZeroPageXIndexed, 4, false),
    (0xcd, CMP, Absolute, 4, false),
    (0xdd, CMP, AbsoluteXIndexed, 4, true),
    (0xd9, CMP, AbsoluteYIndexed, 4, true),
    (0xc1, CMP, ZeroPageXIndexedIndirect, 6, false),
    (0xd1, CMP, ZeroPageIndirectYIndexed, 5, true),
    (0xe0, CPX, Immediate, 2, false),
    (0xe4, CPX, ZeroPage, 3, false),
    (0xec, CPX, Absolute, 4, false),
    (0xc0, CPY, Immediate, 2, false),
    (0xc4, CPY, ZeroPage, 3, false),
    (0xcc, CPY, Absolute, 4, false),
    (0xc6, DEC, ZeroPage, 5, false),
    (0xd6, DEC, ZeroPageXIndexed, 6, false),
    (0xce, DEC, Absolute, 6, false),
    (0xde, DEC, AbsoluteXIndexed, 7, false),
    (0xca, DEX, Implied, 2, false),
    (0x88, DEY, Implied, 2, false),
    (0x49, EOR, Immediate, 2, false),
    (0x45, EOR, ZeroPage, 3, false),
    (0x55, EOR, ZeroPageXIndexed, 4, false),
    (0x4d, EOR, Absolute, 4, false),
    (0x5d, EOR, AbsoluteXIndexed, 4, true),
    (0x59, EOR, AbsoluteYIndexed, 4, true),
    (0x41, EOR, ZeroPageXIndexedIndirect, 6, false),
    (0x51, EOR, ZeroPageIndirectYIndexed, 5, true),
    (0xe6, INC, ZeroPage, 5, false),
    (0xf6, INC, ZeroPageXIndexed, 6, false),
    (0xee, INC, Absolute, 6, false),
    (0xfe, INC, AbsoluteXIndexed, 7, false),
    (0xe8, INX, Implied, 2, false),
    (0xc8, INY, Implied, 2, false),
    (0x4c, JMP, Absolute, 3, false),
    (0x6c, JMP, Indirect, 5, false),
    (0x20, JSR, Absolute, 6, false),
    (0xa9, LDA, Immediate, 2, false),
    (0xa5, LDA, ZeroPage, 3, false),
    (0xb5, LDA, ZeroPageXIndexed, 4, false),
    (0xad, LDA, Absolute, 4, false),
    (0xbd, LDA, AbsoluteXIndexed, 4, true),
    (0xb9, LDA, AbsoluteYIndexed, 4, true),
    (0xa1, LDA, ZeroPageXIndexedIndirect, 6, false),
    (0xb1, LDA, ZeroPageIndirectYIndexed, 5, true),
    (0xa2, LDX, Immediate, 2, false),
    (0xa6, LDX, ZeroPage, 3, false),
    (0xb6, LDX, ZeroPageYIndexed, 4, false),
    (0xae, LDX, Absolute, 4, false),
    (0xbe, LDX, AbsoluteYIndexed, 4, true),
    (0xa0, LDY, Immediate, 2, false),
    (0xa4, LDY, ZeroPage, 3, false),
    (0xb4, LDY, ZeroPageXIndexed, 4, false),
    (0xac, LDY, Absolute, 4, false),
    (0xbc, LDY, AbsoluteXIndexed, 4, true),
    (0x4a, LSR, Accumulator, 2, false),
    (0x46, LSR, ZeroPage, 5, false),
    (0x56, LSR, ZeroPageXIndexed, 6, false),
    (0x4e, LSR, Absolute, 6, false),
    (0x5e, LSR, AbsoluteXIndexed, 7, false),
    (0xea, NOP, Implied, 2, false),
    (0x09, ORA, Immediate, 2, false),
    (0x05, ORA, ZeroPage, 3, false),
    (0x15, ORA, ZeroPageXIndexed, 4, false),
    (0x0d, ORA, Absolute, 4, false),
    (0x1d, ORA, AbsoluteXIndexed, 4, true),
    (0x19, ORA, AbsoluteYIndexed, 4, true),
    (0x01, ORA, ZeroPageXIndexedIndirect, 6, false),
    (0x11, ORA, ZeroPageIndirectYIndexed, 5, true),
    (0x48, PHA, Implied, 3, false),
    (0x08, PHP, Implied, 3, false),
    (0x68, PLA, Implied, 4, false),
    (0x28, PLP, Implied, 4, false),
    (0x2a, ROL, Accumulator, 2, false),
    (0x26, ROL, ZeroPage, 5, false),
    (0x36, ROL, ZeroPageXIndexed, 6, false),
    (0x2e, ROL, Absolute, 6, false),
    (0x3e, ROL, AbsoluteXIndexed, 7, false),
    (0x6a, ROR, Accumulator, 2, false),
    (0x66, ROR, ZeroPage, 5, false),
    (0x76, ROR, ZeroPageXIndexed, 6, false),
    (0x6e, ROR, Absolute, 6, false),
    (0x7e, ROR, AbsoluteXIndexed, 7, false),
    (0x40, RTI, Implied, 6, false),
    (0x60, RTS, Implied, 6, false),
    (0xe9, SBC, Immediate, 2, false),
    (0xe5, SBC, ZeroPage, 3, false),
    (0xf5, SBC, ZeroPageXIndexed, 4, false),
    (0xed, SBC, Absolute, 4, false),
    (0xfd, SBC, AbsoluteXIndexed, 4, true),
    (0xf9, SBC, AbsoluteYIndexed, 4, true),
    (0xe1, SBC, ZeroPageXIndexedIndirect, 6, false),
    (0xf1, SBC, ZeroPageIndirectYIndexed, 5, true),
    (0x38, SEC, Implied, 2, false),
    (0xf8, SED, Implied, 2, false),
    (0x78, SEI, Implied, 2, false),
    (0x85, STA, ZeroPage, 3, false),
    (0x95, STA, ZeroPageXIndexed, 4, false),
    (0x8d, STA, Absolute, 4, false),
    (0x9d, STA, AbsoluteXIndexed, 5, false),
    (0x99, STA, AbsoluteYIndexed, 5, false),
    (0x81, STA, ZeroPageXIndexedIndirect, 6, false),
    (0x91, STA, ZeroPageIndirectYIndexed, 6, false),
    (0x86, STX, ZeroPage, 3, false),
    (0x96, STX, ZeroPageYIndexed, 4, false),
    (0x8e, STX, Absolute, 4, false),
    (0x84, STY, ZeroPage, 3, false),
    (0x94, STY, ZeroPageXIndexed, 4, false),
    (0x8c, STY, Absolute, 4, false),
    (0xaa, TAX, Implied, 2, false),
    (0xa8, TAY, Implied, 2, false),
    (0xba, TSX, Implied, 2, false),
    (0x8a, TXA, Implied, 2, false),
    (0x9a, TXS, Implied, 2, false),
    (0x98, TYA, Implied, 2, false),
];

/// Opcode → instruction table, with per-opcode usage statistics.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    instructions: Vec<Option<CPUInstruction>>,
    stats: BTreeMap<u8, u64>,
}

impl Default for InstructionSet {
    fn default() -> Self {
        InstructionSet {
            instructions: vec![None; 256],
            stats: BTreeMap::new(),
        }
    }
}

impl InstructionSet {
    /// The 151 documented opcodes of the NMOS 6502.
    pub fn standard() -> Result<InstructionSet, InstructionSetError> {
        let mut set = InstructionSet::default();

        for &(opcode, mnemonic, addressing_mode, cycles, page_penalty) in OPCODES.iter() {
            let instruction = CPUInstruction::new(
                opcode,
                mnemonic,
                addressing_mode,
                cycles,
                mnemonic.description(),
            );
            set.register(if page_penalty {
                instruction.with_page_penalty()
            } else {
                instruction
            })?;
        }

        Ok(set)
    }

    pub fn register(&mut self, instruction: CPUInstruction) -> Result<(), InstructionSetError> {
        let slot = &mut self.instructions[instruction.opcode as usize];

        if slot.is_some() {
            return Err(InstructionSetError::DuplicateOpcode(instruction.opcode));
        }
        *slot = Some(instruction);

        Ok(())
    }

    /// Fetch the instruction for `opcode` and count one use of it.
    pub fn get(&mut self, opcode: u8) -> Option<CPUInstruction> {
        let instruction = self.instructions[opcode as usize]?;
        *self.stats.entry(opcode).or_insert(0) += 1;

        Some(instruction)
    }

    /// Same as `get` without touching the statistics.
    pub fn lookup(&self, opcode: u8) -> Option<&CPUInstruction> {
        self.instructions[opcode as usize].as_ref()
    }

    pub fn contains(&self, opcode: u8) -> bool {
        self.instructions[opcode as usize].is_some()
    }

    pub fn info(&self, opcode: u8) -> Option<InstructionInfo> {
        self.lookup(opcode).map(CPUInstruction::info)
    }

    /// Number of times each opcode went through `get`. Unused opcodes are absent.
    pub fn stats(&self) -> &BTreeMap<u8, u64> {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.clear();
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered instructions by increasing opcode.
    pub fn iter(&self) -> impl Iterator<Item = &CPUInstruction> {
        self.instructions.iter().flatten()
    }
}
