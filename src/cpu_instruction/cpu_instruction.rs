use super::microcode::{self, Result as MicrocodeResult};
use crate::addressing_mode::*;
use crate::memory::Bus;
use crate::registers::Registers;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mnemonic {
    ADC,
    AND,
    ASL,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad with the caller's width: `{: <4}` must work on mnemonics
        f.pad(&format!("{:?}", self))
    }
}

/// Immutable description of one opcode.
///
/// `page_penalty` marks read instructions that pay one more cycle when an
/// indexed address crosses a page boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CPUInstruction {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub addressing_mode: AddressingMode,
    pub cycles: u8,
    pub page_penalty: bool,
    pub description: &'static str,
}

impl CPUInstruction {
    pub const fn new(
        opcode: u8,
        mnemonic: Mnemonic,
        addressing_mode: AddressingMode,
        cycles: u8,
        description: &'static str,
    ) -> CPUInstruction {
        CPUInstruction {
            opcode,
            mnemonic,
            addressing_mode,
            cycles,
            page_penalty: false,
            description,
        }
    }

    pub const fn with_page_penalty(mut self) -> CPUInstruction {
        self.page_penalty = true;
        self
    }

    pub fn bytes(&self) -> u8 {
        self.addressing_mode.bytes()
    }

    /// Run the instruction. The command pointer must sit right after the
    /// opcode; it is left on the next instruction to execute.
    pub fn execute(&self, bus: &mut Bus, registers: &mut Registers) -> MicrocodeResult<LogLine> {
        let microcode = match self.mnemonic {
            Mnemonic::ADC => microcode::adc,
            Mnemonic::AND => microcode::and,
            Mnemonic::ASL => microcode::asl,
            Mnemonic::BCC => microcode::bcc,
            Mnemonic::BCS => microcode::bcs,
            Mnemonic::BEQ => microcode::beq,
            Mnemonic::BIT => microcode::bit,
            Mnemonic::BMI => microcode::bmi,
            Mnemonic::BNE => microcode::bne,
            Mnemonic::BPL => microcode::bpl,
            Mnemonic::BRK => microcode::brk,
            Mnemonic::BVC => microcode::bvc,
            Mnemonic::BVS => microcode::bvs,
            Mnemonic::CLC => microcode::clc,
            Mnemonic::CLD => microcode::cld,
            Mnemonic::CLI => microcode::cli,
            Mnemonic::CLV => microcode::clv,
            Mnemonic::CMP => microcode::cmp,
            Mnemonic::CPX => microcode::cpx,
            Mnemonic::CPY => microcode::cpy,
            Mnemonic::DEC => microcode::dec,
            Mnemonic::DEX => microcode::dex,
            Mnemonic::DEY => microcode::dey,
            Mnemonic::EOR => microcode::eor,
            Mnemonic::INC => microcode::inc,
            Mnemonic::INX => microcode::inx,
            Mnemonic::INY => microcode::iny,
            Mnemonic::JMP => microcode::jmp,
            Mnemonic::JSR => microcode::jsr,
            Mnemonic::LDA => microcode::lda,
            Mnemonic::LDX => microcode::ldx,
            Mnemonic::LDY => microcode::ldy,
            Mnemonic::LSR => microcode::lsr,
            Mnemonic::NOP => microcode::nop,
            Mnemonic::ORA => microcode::ora,
            Mnemonic::PHA => microcode::pha,
            Mnemonic::PHP => microcode::php,
            Mnemonic::PLA => microcode::pla,
            Mnemonic::PLP => microcode::plp,
            Mnemonic::ROL => microcode::rol,
            Mnemonic::ROR => microcode::ror,
            Mnemonic::RTI => microcode::rti,
            Mnemonic::RTS => microcode::rts,
            Mnemonic::SBC => microcode::sbc,
            Mnemonic::SEC => microcode::sec,
            Mnemonic::SED => microcode::sed,
            Mnemonic::SEI => microcode::sei,
            Mnemonic::STA => microcode::sta,
            Mnemonic::STX => microcode::stx,
            Mnemonic::STY => microcode::sty,
            Mnemonic::TAX => microcode::tax,
            Mnemonic::TAY => microcode::tay,
            Mnemonic::TSX => microcode::tsx,
            Mnemonic::TXA => microcode::txa,
            Mnemonic::TXS => microcode::txs,
            Mnemonic::TYA => microcode::tya,
        };

        microcode(bus, registers, self)
    }

    /// Base cycles plus the page crossing penalty when it applies.
    pub fn adjust_base_cycles(&self, resolution: &AddressingModeResolution) -> u8 {
        if self.page_penalty && resolution.page_crossed {
            self.cycles + 1
        } else {
            self.cycles
        }
    }

    /// Cycles of a branch: one more when taken, another one when the
    /// destination sits in a different page.
    pub fn branch_cycles(&self, taken: bool, resolution: &AddressingModeResolution) -> u8 {
        match (taken, resolution.page_crossed) {
            (false, _) => self.cycles,
            (true, false) => self.cycles + 1,
            (true, true) => self.cycles + 2,
        }
    }

    pub fn info(&self) -> InstructionInfo {
        InstructionInfo {
            opcode: self.opcode,
            mnemonic: self.mnemonic,
            addressing_mode: self.addressing_mode.name(),
            mode: self.addressing_mode,
            bytes: self.bytes(),
            cycles: self.cycles,
            description: self.description,
        }
    }
}

impl fmt::Display for CPUInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#0x{:02X} {: <4} {: <11} ({} bytes, {} cycles)",
            self.opcode,
            self.mnemonic,
            self.addressing_mode.name(),
            self.bytes(),
            self.cycles
        )
    }
}

/// Metadata exported for each registered opcode, as a disassembler needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionInfo {
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    /// Exported name of the addressing mode, `zeroPageX`, `indirectY`...
    pub addressing_mode: &'static str,
    pub mode: AddressingMode,
    pub bytes: u8,
    pub cycles: u8,
    pub description: &'static str,
}

/// What happened during one instruction, used for trace output.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub address: u16,
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub resolution: AddressingModeResolution,
    pub outcome: String,
    pub cycles: u8,
}

impl LogLine {
    pub fn new(
        cpu_instruction: &CPUInstruction,
        resolution: AddressingModeResolution,
        outcome: String,
        cycles: u8,
    ) -> LogLine {
        LogLine {
            address: resolution.opcode_address,
            opcode: cpu_instruction.opcode,
            mnemonic: cpu_instruction.mnemonic,
            resolution,
            outcome,
            cycles,
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = vec![self.opcode];
        bytes.extend_from_slice(&self.resolution.operands);
        let byte_sequence = format!(
            "({})",
            bytes
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .collect::<Vec<String>>()
                .join(" ")
        );

        write!(
            f,
            "#0x{:04X}: {: <14}{: <4} {} {}[{}]",
            self.address, byte_sequence, self.mnemonic, self.resolution, self.outcome, self.cycles
        )
    }
}
