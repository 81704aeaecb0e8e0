use super::memory::{Bus, MemoryError};
use num_traits::{NumCast, PrimInt, WrappingAdd, WrappingSub};
use std::fmt;
/*
 * 6502 registers
 * accumulator, X & Y registers are 8 bits general purpose registers.
 * status flags register :
 * bit 7: Negative flag
 * bit 6: oVerflow flag
 * bit 5: not used, always reads as 1
 * bit 4: Break
 * bit 3: Decimal mode
 * bit 2: Interrupt disable
 * bit 1: Zero flag
 * bit 0: Carry flag
 *
 * command pointer: 16 bit address register
 * stack pointer: 8 bits at page 0x0100, set at 0xfd after reset.
 */
pub const STACK_BASE_ADDR: u16 = 0x0100;
pub const STACK_POINTER_INIT: u8 = 0xfd;

/// An N bits unsigned register. Every write wraps to the register width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Register<T> {
    name: &'static str,
    value: T,
    initial: T,
}

impl<T> Register<T>
where
    T: PrimInt + WrappingAdd + WrappingSub + fmt::UpperHex,
{
    pub fn new(name: &'static str, initial: T) -> Register<T> {
        Register {
            name,
            value: initial,
            initial,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    pub fn set(&mut self, value: T) -> T {
        self.value = value;
        value
    }

    /// Keep the low bits of `raw`, whatever its sign or magnitude.
    pub fn set_raw(&mut self, raw: i64) -> T {
        let mask = <i64 as NumCast>::from(T::max_value()).unwrap_or(i64::MAX);
        let value = <T as NumCast>::from(raw & mask).unwrap_or_else(T::zero);
        self.set(value)
    }

    pub fn increment(&mut self, amount: T) -> T {
        self.set(self.value.wrapping_add(&amount))
    }

    pub fn decrement(&mut self, amount: T) -> T {
        self.set(self.value.wrapping_sub(&amount))
    }

    pub fn reset(&mut self) {
        self.value = self.initial;
    }

    pub fn bits(&self) -> u32 {
        T::zero().count_zeros()
    }

    pub fn bit(&self, bit: u32) -> bool {
        bit < self.bits() && (self.value >> bit as usize) & T::one() == T::one()
    }

    pub fn set_bit(&mut self, bit: u32, flag: bool) {
        if bit >= self.bits() {
            return;
        }
        let mask = T::one() << bit as usize;
        self.value = if flag {
            self.value | mask
        } else {
            self.value & !mask
        };
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> fmt::Display for Register<T>
where
    T: PrimInt + WrappingAdd + WrappingSub + fmt::UpperHex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.bits() / 4) as usize;
        write!(f, "{}=${:0width$X}", self.name, self.value, width = width)
    }
}

impl<T> fmt::Debug for Register<T>
where
    T: PrimInt + WrappingAdd + WrappingSub + fmt::UpperHex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// The processor status register (P).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister {
    register: Register<u8>,
}

impl StatusRegister {
    pub const NEGATIVE: u8 = 0b1000_0000;
    pub const OVERFLOW: u8 = 0b0100_0000;
    pub const UNUSED: u8 = 0b0010_0000;
    pub const BREAK: u8 = 0b0001_0000;
    pub const DECIMAL: u8 = 0b0000_1000;
    pub const INTERRUPT: u8 = 0b0000_0100;
    pub const ZERO: u8 = 0b0000_0010;
    pub const CARRY: u8 = 0b0000_0001;

    const NAMES: [(u8, char); 8] = [
        (Self::NEGATIVE, 'N'),
        (Self::OVERFLOW, 'V'),
        (Self::UNUSED, '-'),
        (Self::BREAK, 'B'),
        (Self::DECIMAL, 'D'),
        (Self::INTERRUPT, 'I'),
        (Self::ZERO, 'Z'),
        (Self::CARRY, 'C'),
    ];

    pub fn new(initial: u8) -> StatusRegister {
        StatusRegister {
            register: Register::new("P", initial | Self::UNUSED),
        }
    }

    pub fn get(&self) -> u8 {
        self.register.get()
    }

    pub fn set(&mut self, value: u8) {
        self.register.set(value | Self::UNUSED);
    }

    pub fn reset(&mut self) {
        self.register.reset();
    }

    pub fn flag(&self, mask: u8) -> bool {
        self.get() & mask != 0
    }

    pub fn set_flag(&mut self, mask: u8, flag: bool) {
        let value = if flag {
            self.get() | mask
        } else {
            self.get() & !mask
        };
        self.set(value);
    }

    pub fn update_zero_flag(&mut self, value: u8) {
        self.set_flag(Self::ZERO, value == 0);
    }

    pub fn update_negative_flag(&mut self, value: u8) {
        self.set_flag(Self::NEGATIVE, value & 0x80 != 0);
    }

    /// Set when both operands share a sign the result does not have.
    pub fn update_overflow_flag(&mut self, a: u8, b: u8, result: u8) {
        self.set_flag(Self::OVERFLOW, !(a ^ b) & (a ^ result) & 0x80 != 0);
    }

    /// `raw` is the untruncated sum.
    pub fn update_carry_flag(&mut self, raw: u16) {
        self.set_flag(Self::CARRY, raw > 0xff);
    }

    pub fn formatted(&self) -> String {
        Self::NAMES
            .iter()
            .map(|&(mask, name)| {
                if self.flag(mask) {
                    name
                } else {
                    name.to_ascii_lowercase()
                }
            })
            .collect()
    }
}

impl Default for StatusRegister {
    fn default() -> Self {
        StatusRegister::new(Self::UNUSED | Self::INTERRUPT)
    }
}

impl fmt::Display for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P={:02X} [{}]", self.get(), self.formatted())
    }
}

impl fmt::Debug for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Register selector for callers that need uniform access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterName {
    A,
    X,
    Y,
    PC,
    SP,
    P,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub accumulator: Register<u8>,
    pub register_x: Register<u8>,
    pub register_y: Register<u8>,
    pub stack_pointer: Register<u8>,
    pub command_pointer: Register<u16>,
    pub status: StatusRegister,
}

impl Registers {
    pub fn new(init_address: u16) -> Registers {
        Registers {
            accumulator: Register::new("A", 0x00),
            register_x: Register::new("X", 0x00),
            register_y: Register::new("Y", 0x00),
            stack_pointer: Register::new("SP", STACK_POINTER_INIT),
            command_pointer: Register::new("PC", init_address),
            status: StatusRegister::default(),
        }
    }

    /// Power-on values: A, X, Y cleared, SP at 0xfd, only I and the unused
    /// bit set, command pointer at `init_address`.
    pub fn reset(&mut self, init_address: u16) {
        self.accumulator.reset();
        self.register_x.reset();
        self.register_y.reset();
        self.stack_pointer.reset();
        self.status.reset();
        self.command_pointer.set(init_address);
    }

    pub fn get(&self, name: RegisterName) -> u16 {
        match name {
            RegisterName::A => self.accumulator.get() as u16,
            RegisterName::X => self.register_x.get() as u16,
            RegisterName::Y => self.register_y.get() as u16,
            RegisterName::PC => self.command_pointer.get(),
            RegisterName::SP => self.stack_pointer.get() as u16,
            RegisterName::P => self.status.get() as u16,
        }
    }

    pub fn set(&mut self, name: RegisterName, value: u16) {
        match name {
            RegisterName::A => {
                self.accumulator.set_raw(value as i64);
            }
            RegisterName::X => {
                self.register_x.set_raw(value as i64);
            }
            RegisterName::Y => {
                self.register_y.set_raw(value as i64);
            }
            RegisterName::SP => {
                self.stack_pointer.set_raw(value as i64);
            }
            RegisterName::PC => {
                self.command_pointer.set(value);
            }
            RegisterName::P => self.status.set(value as u8),
        }
    }

    pub fn stack_address(&self) -> u16 {
        STACK_BASE_ADDR | self.stack_pointer.get() as u16
    }

    pub fn stack_push(&mut self, bus: &mut Bus, byte: u8) -> Result<(), MemoryError> {
        bus.write(self.stack_address(), byte)?;
        self.stack_pointer.decrement(1);

        Ok(())
    }

    pub fn stack_pull(&mut self, bus: &Bus) -> Result<u8, MemoryError> {
        self.stack_pointer.increment(1);
        bus.read(self.stack_address())
    }

    /// Push high byte first so the word reads little endian in memory.
    pub fn stack_push_word(&mut self, bus: &mut Bus, word: u16) -> Result<(), MemoryError> {
        let [low, high] = word.to_le_bytes();
        self.stack_push(bus, high)?;
        self.stack_push(bus, low)
    }

    pub fn stack_pull_word(&mut self, bus: &Bus) -> Result<u16, MemoryError> {
        let low = self.stack_pull(bus)?;
        let high = self.stack_pull(bus)?;

        Ok(u16::from_le_bytes([low, high]))
    }

    /// Move the command pointer past the operand bytes of an instruction
    /// whose opcode has already been fetched.
    pub fn skip_operands(&mut self, instruction_bytes: u8) {
        self.command_pointer
            .increment(instruction_bytes.saturating_sub(1) as u16);
    }

    pub fn update_nz_flags(&mut self, value: u8) {
        self.status.update_zero_flag(value);
        self.status.update_negative_flag(value);
    }

    pub fn n_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::NEGATIVE)
    }

    pub fn v_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::OVERFLOW)
    }

    pub fn b_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::BREAK)
    }

    pub fn d_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::DECIMAL)
    }

    pub fn i_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::INTERRUPT)
    }

    pub fn z_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::ZERO)
    }

    pub fn c_flag_is_set(&self) -> bool {
        self.status.flag(StatusRegister::CARRY)
    }

    pub fn set_n_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::NEGATIVE, flag);
    }

    pub fn set_v_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::OVERFLOW, flag);
    }

    pub fn set_b_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::BREAK, flag);
    }

    pub fn set_d_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::DECIMAL, flag);
    }

    pub fn set_i_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::INTERRUPT, flag);
    }

    pub fn set_z_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::ZERO, flag);
    }

    pub fn set_c_flag(&mut self, flag: bool) {
        self.status.set_flag(StatusRegister::CARRY, flag);
    }

    pub fn format_status(&self) -> String {
        self.status.formatted()
    }
}

impl fmt::Debug for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registers [A:0x{:02x}, X:0x{:02x}, Y:0x{:02x} | SP:0x{:02x} CP:0x{:04x} | {}]",
            self.accumulator.get(),
            self.register_x.get(),
            self.register_y.get(),
            self.stack_pointer.get(),
            self.command_pointer.get(),
            self.format_status()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_flags() {
        let registers = Registers::new(0x1000);
        assert!(!registers.z_flag_is_set());
        assert!(!registers.n_flag_is_set());
        assert!(!registers.b_flag_is_set());
        assert!(registers.i_flag_is_set());
        assert!(!registers.d_flag_is_set());
        assert!(!registers.c_flag_is_set());
        assert!(!registers.v_flag_is_set());
        assert_eq!(0x24, registers.status.get());
        assert_eq!(0xfd, registers.stack_pointer.get());
    }

    #[test]
    fn test_set_flags() {
        let mut registers = Registers::new(0x1000);
        registers.set_c_flag(true);
        registers.set_v_flag(true);
        registers.set_z_flag(true);
        registers.set_n_flag(true);
        assert!(registers.c_flag_is_set());
        assert!(registers.v_flag_is_set());
        assert!(registers.z_flag_is_set());
        assert!(registers.n_flag_is_set());
        registers.set_z_flag(false);
        registers.set_n_flag(false);
        registers.set_c_flag(false);
        registers.set_v_flag(false);
        assert!(!registers.z_flag_is_set());
        assert!(!registers.n_flag_is_set());
        assert!(!registers.c_flag_is_set());
        assert!(!registers.v_flag_is_set());
    }

    #[test]
    fn test_register_wraps() {
        let mut a: Register<u8> = Register::new("A", 0);
        assert_eq!(0xff, a.decrement(1));
        assert_eq!(0x00, a.increment(1));
        assert_eq!(0x04, a.increment(0x04));
        assert_eq!(0x23, a.set_raw(0x123));
        assert_eq!(0xff, a.set_raw(-1));

        let mut pc: Register<u16> = Register::new("PC", 0xffff);
        assert_eq!(0x0000, pc.increment(1));
        assert_eq!(0xfffe, pc.decrement(2));
        assert_eq!(0x0001, pc.set_raw(0x10001));
        pc.reset();
        assert_eq!(0xffff, pc.get());
    }

    #[test]
    fn test_register_bits() {
        let mut x: Register<u8> = Register::new("X", 0);
        assert_eq!(8, x.bits());
        x.set_bit(7, true);
        x.set_bit(0, true);
        assert_eq!(0x81, x.get());
        assert!(x.bit(7));
        assert!(!x.bit(6));
        x.set_bit(7, false);
        x.set_bit(12, true);
        assert_eq!(0x01, x.get());
        assert!(!x.bit(12));
        assert_eq!(16, Register::<u16>::new("PC", 0).bits());
    }

    #[test]
    fn test_register_display() {
        assert_eq!("A=$2A", Register::<u8>::new("A", 0x2a).to_string());
        assert_eq!("PC=$0400", Register::<u16>::new("PC", 0x0400).to_string());
        assert_eq!("P=24 [nv-bdIzc]", StatusRegister::default().to_string());
    }

    #[test]
    fn test_unused_bit_is_pinned() {
        let mut status = StatusRegister::new(0x00);
        assert_eq!(0x20, status.get());
        status.set(0x00);
        assert_eq!(0x20, status.get());
        status.set_flag(StatusRegister::UNUSED, false);
        assert!(status.flag(StatusRegister::UNUSED));
        status.set_flag(StatusRegister::CARRY, true);
        assert_eq!(0x21, status.get());
    }

    #[test]
    fn test_zero_and_negative_over_full_domain() {
        let mut status = StatusRegister::default();
        for v in 0..=255u8 {
            status.update_zero_flag(v);
            status.update_negative_flag(v);
            assert_eq!(v == 0, status.flag(StatusRegister::ZERO));
            assert_eq!(v & 0x80 != 0, status.flag(StatusRegister::NEGATIVE));
        }
    }

    #[test]
    fn test_overflow_and_carry() {
        let mut status = StatusRegister::default();
        status.update_overflow_flag(0x50, 0x50, 0xa0);
        assert!(status.flag(StatusRegister::OVERFLOW));
        status.update_overflow_flag(0x50, 0x90, 0xe0);
        assert!(!status.flag(StatusRegister::OVERFLOW));
        status.update_overflow_flag(0xd0, 0x90, 0x60);
        assert!(status.flag(StatusRegister::OVERFLOW));
        status.update_carry_flag(0x100);
        assert!(status.flag(StatusRegister::CARRY));
        status.update_carry_flag(0xff);
        assert!(!status.flag(StatusRegister::CARRY));
    }

    #[test]
    fn test_named_access() {
        let mut registers = Registers::new(0x0400);
        registers.set(RegisterName::A, 0x12a);
        registers.set(RegisterName::PC, 0x1234);
        registers.set(RegisterName::P, 0x00);
        assert_eq!(0x2a, registers.get(RegisterName::A));
        assert_eq!(0x1234, registers.get(RegisterName::PC));
        assert_eq!(0x20, registers.get(RegisterName::P));
        assert_eq!(0xfd, registers.get(RegisterName::SP));
    }

    #[test]
    fn test_stack_wraps_in_page_one() {
        let mut bus = Bus::with_ram();
        let mut registers = Registers::new(0x0400);
        registers.stack_pointer.set(0x00);
        registers.stack_push(&mut bus, 0xaa).unwrap();
        assert_eq!(0xff, registers.stack_pointer.get());
        assert_eq!(0xaa, bus.read(0x0100).unwrap());
        registers.stack_push(&mut bus, 0xbb).unwrap();
        assert_eq!(0xbb, bus.read(0x01ff).unwrap());
        assert_eq!(0xbb, registers.stack_pull(&bus).unwrap());
        assert_eq!(0xaa, registers.stack_pull(&bus).unwrap());
        assert_eq!(0x00, registers.stack_pointer.get());
    }

    #[test]
    fn test_stack_words() {
        let mut bus = Bus::with_ram();
        let mut registers = Registers::new(0x0400);
        registers.stack_push_word(&mut bus, 0x1234).unwrap();
        assert_eq!(0x12, bus.read(0x01fd).unwrap());
        assert_eq!(0x34, bus.read(0x01fc).unwrap());
        assert_eq!(0xfb, registers.stack_pointer.get());
        assert_eq!(0x1234, registers.stack_pull_word(&bus).unwrap());
        assert_eq!(0xfd, registers.stack_pointer.get());
    }
}
