use crate::addressing_mode::AddressingMode;
use crate::cpu_instruction::{InstructionInfo, InstructionSet, InstructionSetError, Mnemonic};
use crate::memory::{little_endian, Bus, Result};
use std::fmt;

/// How disassembled lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub show_address: bool,
    pub show_bytes: bool,
    /// Mnemonics in upper case (`LDA`) or lower case (`lda`).
    pub uppercase: bool,
    /// Width of the raw bytes column.
    pub bytes_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            show_address: true,
            show_bytes: true,
            uppercase: true,
            bytes_width: 12,
        }
    }
}

/// One decoded instruction. `info` is `None` for an unregistered opcode, such
/// a line is one byte long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassembledLine {
    pub address: u16,
    pub opcode: u8,
    pub bytes: Vec<u8>,
    pub info: Option<InstructionInfo>,
    pub operand: Option<u16>,
    pub target: Option<u16>,
}

impl DisassembledLine {
    pub fn len(&self) -> u16 {
        self.bytes.len() as u16
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mnemonic(&self) -> Option<Mnemonic> {
        self.info.map(|info| info.mnemonic)
    }

    pub fn addressing_mode(&self) -> Option<&'static str> {
        self.info.map(|info| info.addressing_mode)
    }

    /// Operand in assembler syntax, empty for implied instructions.
    pub fn operand_text(&self) -> String {
        let info = match self.info {
            Some(info) => info,
            None => return format!("(${:02X})", self.opcode),
        };
        let value = self.operand.unwrap_or(0);

        match info.mode {
            AddressingMode::Implied => String::new(),
            AddressingMode::Accumulator => "A".to_owned(),
            AddressingMode::Immediate => format!("#${:02X}", value),
            AddressingMode::ZeroPage => format!("${:02X}", value),
            AddressingMode::ZeroPageXIndexed => format!("${:02X},X", value),
            AddressingMode::ZeroPageYIndexed => format!("${:02X},Y", value),
            AddressingMode::Absolute => format!("${:04X}", value),
            AddressingMode::AbsoluteXIndexed => format!("${:04X},X", value),
            AddressingMode::AbsoluteYIndexed => format!("${:04X},Y", value),
            AddressingMode::Indirect => format!("(${:04X})", value),
            AddressingMode::ZeroPageXIndexedIndirect => format!("(${:02X},X)", value),
            AddressingMode::ZeroPageIndirectYIndexed => format!("(${:02X}),Y", value),
            AddressingMode::Relative => format!("${:04X}", self.target.unwrap_or(value)),
        }
    }

    pub fn format(&self, options: &FormatOptions) -> String {
        let mut output = String::new();

        if options.show_address {
            output.push_str(&format!("${:04X}: ", self.address));
        }
        if options.show_bytes {
            let bytes = self
                .bytes
                .iter()
                .map(|byte| format!("{:02X}", byte))
                .collect::<Vec<String>>()
                .join(" ");
            output.push_str(&format!("{: <width$}", bytes, width = options.bytes_width));
        }

        let mnemonic = match self.mnemonic() {
            Some(mnemonic) if options.uppercase => mnemonic.to_string(),
            Some(mnemonic) => mnemonic.to_string().to_lowercase(),
            None => "???".to_owned(),
        };
        output.push_str(&mnemonic);

        let operand = self.operand_text();
        if !operand.is_empty() {
            output.push(' ');
            output.push_str(&operand);
        }

        output
    }
}

impl fmt::Display for DisassembledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&FormatOptions::default()))
    }
}

/// Turns bytes on the bus back into assembler text using the metadata of
/// an instruction set. Reading does not alter the bus.
#[derive(Debug, Clone)]
pub struct Disassembler {
    instruction_set: InstructionSet,
    options: FormatOptions,
}

impl Disassembler {
    pub fn new(instruction_set: InstructionSet) -> Disassembler {
        Disassembler {
            instruction_set,
            options: FormatOptions::default(),
        }
    }

    pub fn standard() -> std::result::Result<Disassembler, InstructionSetError> {
        Ok(Disassembler::new(InstructionSet::standard()?))
    }

    pub fn with_options(mut self, options: FormatOptions) -> Disassembler {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn disassemble_instruction(&self, bus: &Bus, addr: u16) -> Result<DisassembledLine> {
        let opcode = bus.read(addr)?;
        let info = match self.instruction_set.info(opcode) {
            Some(info) => info,
            None => {
                return Ok(DisassembledLine {
                    address: addr,
                    opcode,
                    bytes: vec![opcode],
                    info: None,
                    operand: None,
                    target: None,
                })
            }
        };

        let mut bytes = vec![opcode];
        for offset in 1..info.bytes as u16 {
            bytes.push(bus.read(addr.wrapping_add(offset))?);
        }

        let operand = match bytes.len() {
            1 => None,
            _ => Some(little_endian(&bytes[1..])),
        };
        let target = match info.mode {
            AddressingMode::Relative => operand.map(|offset| {
                addr.wrapping_add(info.bytes as u16)
                    .wrapping_add(offset as u8 as i8 as u16)
            }),
            AddressingMode::Implied
            | AddressingMode::Accumulator
            | AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageXIndexed
            | AddressingMode::ZeroPageYIndexed
            | AddressingMode::Absolute
            | AddressingMode::AbsoluteXIndexed
            | AddressingMode::AbsoluteYIndexed
            | AddressingMode::Indirect
            | AddressingMode::ZeroPageXIndexedIndirect
            | AddressingMode::ZeroPageIndirectYIndexed => None,
        };

        Ok(DisassembledLine {
            address: addr,
            opcode,
            bytes,
            info: Some(info),
            operand,
            target,
        })
    }

    /// Decode every instruction starting in `start..start + length`. The last
    /// instruction may spill its operands past the range.
    pub fn disassemble(&self, bus: &Bus, start: u16, length: usize) -> Result<Vec<DisassembledLine>> {
        let end = (start as usize + length).min(0x10000);
        let mut address = start as usize;
        let mut lines: Vec<DisassembledLine> = Vec::new();

        while address < end {
            let line = self.disassemble_instruction(bus, address as u16)?;
            address += line.len() as usize;
            lines.push(line);
        }

        Ok(lines)
    }

    /// Formatted output of `disassemble`, one string per instruction.
    pub fn disassemble_to_strings(&self, bus: &Bus, start: u16, length: usize) -> Result<Vec<String>> {
        Ok(self
            .disassemble(bus, start, length)?
            .iter()
            .map(|line| line.format(&self.options))
            .collect())
    }

    /// Consecutive instructions from `start` up to the end of the address
    /// space. A read error ends the iteration after being yielded.
    pub fn iter<'a>(&'a self, bus: &'a Bus, start: u16) -> Instructions<'a> {
        Instructions {
            disassembler: self,
            bus,
            address: Some(start),
        }
    }
}

pub struct Instructions<'a> {
    disassembler: &'a Disassembler,
    bus: &'a Bus,
    address: Option<u16>,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<DisassembledLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let address = self.address?;

        match self.disassembler.disassemble_instruction(self.bus, address) {
            Ok(line) => {
                self.address = address.checked_add(line.len());
                Some(Ok(line))
            }
            Err(e) => {
                self.address = None;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryError, RAM};

    fn get_bus(addr: u16, program: &[u8]) -> Bus {
        let mut bus = Bus::with_ram();
        bus.write_bytes(addr, program).unwrap();

        bus
    }

    #[test]
    fn test_immediate() {
        let bus = get_bus(0x0800, &[0xa9, 0xc0]);
        let line = Disassembler::standard()
            .unwrap()
            .disassemble_instruction(&bus, 0x0800)
            .unwrap();
        assert_eq!(Some(Mnemonic::LDA), line.mnemonic());
        assert_eq!(Some("immediate"), line.addressing_mode());
        assert_eq!(2, line.len());
        assert_eq!("$0800: A9 C0       LDA #$C0", line.to_string());
    }

    #[test]
    fn test_operand_formats() {
        let disassembler = Disassembler::standard().unwrap();
        let cases: Vec<(Vec<u8>, &str)> = vec![
            (vec![0xea], "NOP"),
            (vec![0x0a], "ASL A"),
            (vec![0xa5, 0x10], "LDA $10"),
            (vec![0xb5, 0x10], "LDA $10,X"),
            (vec![0xb6, 0x10], "LDX $10,Y"),
            (vec![0xad, 0x34, 0x12], "LDA $1234"),
            (vec![0xbd, 0x34, 0x12], "LDA $1234,X"),
            (vec![0xb9, 0x34, 0x12], "LDA $1234,Y"),
            (vec![0x6c, 0xff, 0x12], "JMP ($12FF)"),
            (vec![0xa1, 0x20], "LDA ($20,X)"),
            (vec![0xb1, 0x20], "LDA ($20),Y"),
        ];
        let options = FormatOptions {
            show_address: false,
            show_bytes: false,
            ..FormatOptions::default()
        };

        for (program, expected) in cases {
            let bus = get_bus(0x1000, &program);
            let line = disassembler.disassemble_instruction(&bus, 0x1000).unwrap();
            assert_eq!(expected, line.format(&options));
        }
    }

    #[test]
    fn test_branch_targets() {
        let disassembler = Disassembler::standard().unwrap();
        let bus = get_bus(0x080a, &[0xd0, 0xfe, 0xf0, 0x10]);
        let line = disassembler.disassemble_instruction(&bus, 0x080a).unwrap();
        assert_eq!(Some(0x080a), line.target);
        assert_eq!("$080A", line.operand_text());
        let line = disassembler.disassemble_instruction(&bus, 0x080c).unwrap();
        assert_eq!(Some(0x081e), line.target);
    }

    #[test]
    fn test_unknown_opcode() {
        let bus = get_bus(0x0800, &[0x02, 0xea]);
        let line = Disassembler::standard()
            .unwrap()
            .disassemble_instruction(&bus, 0x0800)
            .unwrap();
        assert_eq!(None, line.info);
        assert_eq!(1, line.len());
        assert_eq!("$0800: 02          ??? ($02)", line.to_string());
    }

    #[test]
    fn test_lowercase() {
        let bus = get_bus(0x0800, &[0x8d, 0x00, 0x02]);
        let disassembler = Disassembler::standard().unwrap().with_options(FormatOptions {
            uppercase: false,
            bytes_width: 10,
            ..FormatOptions::default()
        });
        assert_eq!(
            vec!["$0800: 8D 00 02  sta $0200".to_owned()],
            disassembler.disassemble_to_strings(&bus, 0x0800, 3).unwrap()
        );
    }

    #[test]
    fn test_disassemble_range() {
        let bus = get_bus(0x0800, &[0xa9, 0xc0, 0xaa, 0xe8, 0x69, 0x14, 0x00]);
        let lines = Disassembler::standard()
            .unwrap()
            .disassemble(&bus, 0x0800, 7)
            .unwrap();
        let mnemonics: Vec<Option<Mnemonic>> = lines.iter().map(|l| l.mnemonic()).collect();
        assert_eq!(
            vec![
                Some(Mnemonic::LDA),
                Some(Mnemonic::TAX),
                Some(Mnemonic::INX),
                Some(Mnemonic::ADC),
                Some(Mnemonic::BRK)
            ],
            mnemonics
        );
    }

    #[test]
    fn test_disassemble_does_not_touch_memory() {
        let bus = get_bus(0x0800, &[0x8d, 0x00, 0x02, 0xe6, 0x10]);
        let before = bus.read_bytes(0x0000, 0x1000).unwrap();
        Disassembler::standard()
            .unwrap()
            .disassemble(&bus, 0x0800, 5)
            .unwrap();
        assert_eq!(before, bus.read_bytes(0x0000, 0x1000).unwrap());
    }

    #[test]
    fn test_iterator_stops_on_unmapped() {
        let mut bus = Bus::default();
        bus.connect("RAM", 0x0000, 0x00ff, RAM::default()).unwrap();
        bus.write_bytes(0x00fc, &[0xea, 0xea, 0xea, 0xea]).unwrap();
        let disassembler = Disassembler::standard().unwrap();
        let results: Vec<Result<DisassembledLine>> = disassembler.iter(&bus, 0x00fc).collect();
        assert_eq!(5, results.len());
        assert_eq!(Err(MemoryError::Unmapped(0x0100)), results[4]);
    }

    #[test]
    fn test_iterator_stops_at_end_of_memory() {
        let bus = get_bus(0xfffe, &[0xea, 0xea]);
        let disassembler = Disassembler::standard().unwrap();
        assert_eq!(2, disassembler.iter(&bus, 0xfffe).count());
    }

    #[test]
    fn test_every_opcode_has_its_operand() {
        let set = InstructionSet::standard().unwrap();
        let disassembler = Disassembler::new(set.clone());

        for cpu_instruction in set.iter() {
            let bus = get_bus(0x1000, &[cpu_instruction.opcode, 0x34, 0x12]);
            let line = disassembler.disassemble_instruction(&bus, 0x1000).unwrap();
            let info = line.info.unwrap();
            assert_eq!(cpu_instruction.addressing_mode, info.mode);
            assert_eq!(cpu_instruction.bytes() as u16, line.len());

            let expected = match info.mode {
                AddressingMode::Implied => "",
                AddressingMode::Accumulator => "A",
                AddressingMode::Immediate => "#$34",
                AddressingMode::ZeroPage => "$34",
                AddressingMode::ZeroPageXIndexed => "$34,X",
                AddressingMode::ZeroPageYIndexed => "$34,Y",
                AddressingMode::Absolute => "$1234",
                AddressingMode::AbsoluteXIndexed => "$1234,X",
                AddressingMode::AbsoluteYIndexed => "$1234,Y",
                AddressingMode::Indirect => "($1234)",
                AddressingMode::ZeroPageXIndexedIndirect => "($34,X)",
                AddressingMode::ZeroPageIndirectYIndexed => "($34),Y",
                AddressingMode::Relative => "$1036",
            };
            assert_eq!(expected, line.operand_text(), "opcode 0x{:02X}", cpu_instruction.opcode);
        }
    }
}
