use super::cpu_instruction::{
    InstructionSet, InstructionSetError, LogLine, MicrocodeError, INIT_VECTOR_ADDR,
    INTERRUPT_VECTOR_ADDR, NMI_VECTOR_ADDR,
};
use super::memory::{Bus, MemoryError};
use super::registers::{Registers, StatusRegister};
use log::{debug, trace, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    #[error("execution error: {0}")]
    Microcode(#[from] MicrocodeError),
    #[error("instruction set error: {0}")]
    InstructionSet(#[from] InstructionSetError),
    #[error("illegal opcode 0x{opcode:02X} at address #0x{address:04X}")]
    IllegalOpcode { opcode: u8, address: u16 },
}

pub type Result<T> = std::result::Result<T, CpuError>;

/// What to do when the fetched byte is not a registered opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Log a warning, charge the fallback cycles and go on with the next byte.
    Skip,
    /// Stop with `CpuError::IllegalOpcode`.
    Halt,
}

impl Default for UnknownOpcodePolicy {
    fn default() -> Self {
        UnknownOpcodePolicy::Skip
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    pub unknown_opcode: UnknownOpcodePolicy,
    pub unknown_opcode_cycles: u8,
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            unknown_opcode: UnknownOpcodePolicy::Skip,
            unknown_opcode_cycles: 2,
        }
    }
}

impl CpuConfig {
    pub fn with_unknown_opcode(mut self, policy: UnknownOpcodePolicy) -> Self {
        self.unknown_opcode = policy;
        self
    }

    pub fn with_unknown_opcode_cycles(mut self, cycles: u8) -> Self {
        self.unknown_opcode_cycles = cycles;
        self
    }
}

/// Pending interrupt requests.
///
/// Cloning gives another handle on the same lines, so a peripheral living in
/// another thread can raise IRQ or NMI. Requests are only applied by
/// `Cpu::step`. Each line remembers one pending request, not a queue.
#[derive(Debug, Clone, Default)]
pub struct InterruptLines {
    irq: Arc<AtomicBool>,
    nmi: Arc<AtomicBool>,
}

impl InterruptLines {
    pub fn irq(&self) {
        self.irq.store(true, Ordering::SeqCst);
    }

    pub fn nmi(&self) {
        self.nmi.store(true, Ordering::SeqCst);
    }

    pub fn irq_pending(&self) -> bool {
        self.irq.load(Ordering::SeqCst)
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi.load(Ordering::SeqCst)
    }

    fn take_nmi(&self) -> bool {
        self.nmi.swap(false, Ordering::SeqCst)
    }

    fn take_irq(&self) -> bool {
        self.irq.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.irq.store(false, Ordering::SeqCst);
        self.nmi.store(false, Ordering::SeqCst);
    }
}

/// The execution engine: registers, bus and instruction table.
pub struct Cpu {
    pub registers: Registers,
    pub bus: Bus,
    instruction_set: InstructionSet,
    config: CpuConfig,
    current_cycles: u32,
    total_cycles: u64,
    instructions_executed: u64,
    interrupts: InterruptLines,
}

impl Cpu {
    /// Build a processor on `bus` and reset it. The reset vector at 0xFFFC
    /// must be mapped.
    pub fn new(bus: Bus) -> Result<Cpu> {
        Cpu::with_config(bus, CpuConfig::default())
    }

    pub fn with_config(bus: Bus, config: CpuConfig) -> Result<Cpu> {
        Cpu::with_instruction_set(bus, InstructionSet::standard()?, config)
    }

    pub fn with_instruction_set(
        bus: Bus,
        instruction_set: InstructionSet,
        config: CpuConfig,
    ) -> Result<Cpu> {
        let mut cpu = Cpu {
            registers: Registers::new(0x0000),
            bus,
            instruction_set,
            config,
            current_cycles: 0,
            total_cycles: 0,
            instructions_executed: 0,
            interrupts: InterruptLines::default(),
        };
        cpu.reset()?;

        Ok(cpu)
    }

    /// Power-on state, the command pointer is read from the reset vector.
    /// Pending interrupts and counters are cleared, memory is left as is.
    pub fn reset(&mut self) -> Result<()> {
        let init_address = self.bus.read_word(INIT_VECTOR_ADDR)?;
        self.registers.reset(init_address);
        self.interrupts.clear();
        self.current_cycles = 0;
        self.total_cycles = 0;
        self.instructions_executed = 0;
        debug!("cpu: reset, starting at #0x{:04X}", init_address);

        Ok(())
    }

    /// Request a maskable interrupt, serviced at the next step when I is clear.
    pub fn irq(&self) {
        self.interrupts.irq();
    }

    /// Request a non maskable interrupt, serviced at the next step.
    pub fn nmi(&self) {
        self.interrupts.nmi();
    }

    /// A handle other threads can use to raise interrupts.
    pub fn interrupt_lines(&self) -> InterruptLines {
        self.interrupts.clone()
    }

    /// Execute one instruction, or enter a pending interrupt handler, and
    /// return the number of cycles it took.
    pub fn step(&mut self) -> Result<u32> {
        if let Some(log_line) = self.execute_step()? {
            trace!("{} {}", log_line, self);
        }

        Ok(self.current_cycles)
    }

    /// Run until an instruction leaves the command pointer unchanged (a jump
    /// on itself) or `max_steps` steps have been executed. Returns the log
    /// of executed instructions.
    pub fn run(&mut self, max_steps: usize) -> Result<Vec<LogLine>> {
        let mut logs: Vec<LogLine> = Vec::new();

        for _ in 0..max_steps {
            let cp = self.registers.command_pointer.get();
            if let Some(log_line) = self.execute_step()? {
                trace!("{} {}", log_line, self);
                logs.push(log_line);
            }

            if self.registers.command_pointer.get() == cp {
                break;
            }
        }

        Ok(logs)
    }

    /// Step until at least `cycle_budget` cycles are spent. The last
    /// instruction may overshoot the budget. Returns the cycles spent.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64> {
        let target_cycles = self.total_cycles + cycle_budget;
        let start_cycles = self.total_cycles;

        while self.total_cycles < target_cycles {
            self.step()?;
        }

        Ok(self.total_cycles - start_cycles)
    }

    /// Cycles spent by the last step.
    pub fn current_cycles(&self) -> u32 {
        self.current_cycles
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    pub fn instruction_set(&self) -> &InstructionSet {
        &self.instruction_set
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    fn execute_step(&mut self) -> Result<Option<LogLine>> {
        if self.interrupts.take_nmi() {
            self.service_interrupt(NMI_VECTOR_ADDR)?;
            return Ok(None);
        }
        if !self.registers.i_flag_is_set() && self.interrupts.take_irq() {
            self.service_interrupt(INTERRUPT_VECTOR_ADDR)?;
            return Ok(None);
        }

        let address = self.registers.command_pointer.get();
        let opcode = self.bus.read(address)?;
        self.registers.command_pointer.increment(1);

        let cpu_instruction = match self.instruction_set.get(opcode) {
            Some(cpu_instruction) => cpu_instruction,
            None => return self.unknown_opcode(opcode, address).map(|_| None),
        };
        let log_line = cpu_instruction.execute(&mut self.bus, &mut self.registers)?;
        self.account(log_line.cycles as u32);

        Ok(Some(log_line))
    }

    fn unknown_opcode(&mut self, opcode: u8, address: u16) -> Result<()> {
        match self.config.unknown_opcode {
            UnknownOpcodePolicy::Halt => {
                self.current_cycles = 0;

                Err(CpuError::IllegalOpcode { opcode, address })
            }
            UnknownOpcodePolicy::Skip => {
                warn!(
                    "unknown opcode 0x{:02X} at address #0x{:04X}, skipping",
                    opcode, address
                );
                self.account(self.config.unknown_opcode_cycles as u32);

                Ok(())
            }
        }
    }

    /*
     * IRQ and NMI entry sequence: push the command pointer then the status
     * with B clear, mask interrupts and jump through the vector.
     */
    fn service_interrupt(&mut self, vector: u16) -> Result<()> {
        let return_address = self.registers.command_pointer.get();
        self.registers.stack_push_word(&mut self.bus, return_address)?;
        let status = (self.registers.status.get() & !StatusRegister::BREAK) | StatusRegister::UNUSED;
        self.registers.stack_push(&mut self.bus, status)?;
        self.registers.set_i_flag(true);
        let target_address = self.bus.read_word(vector)?;
        self.registers.command_pointer.set(target_address);
        debug!(
            "cpu: interrupt through #0x{:04X}, from #0x{:04X} to #0x{:04X}",
            vector, return_address, target_address
        );
        self.current_cycles = 7;
        self.total_cycles += 7;

        Ok(())
    }

    fn account(&mut self, cycles: u32) {
        self.current_cycles = cycles;
        self.total_cycles += cycles as u64;
        self.instructions_executed += 1;
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A={:02X} X={:02X} Y={:02X} PC={:04X} SP={:02X} P={:02X} [{}] CYC={}",
            self.registers.accumulator.get(),
            self.registers.register_x.get(),
            self.registers.register_y.get(),
            self.registers.command_pointer.get(),
            self.registers.stack_pointer.get(),
            self.registers.status.get(),
            self.registers.format_status(),
            self.total_cycles
        )
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("registers", &self.registers)
            .field("bus", &self.bus)
            .field("config", &self.config)
            .field("total_cycles", &self.total_cycles)
            .field("instructions_executed", &self.instructions_executed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RAM, ROM};

    fn get_cpu(program: &[u8]) -> Cpu {
        let mut bus = Bus::with_ram();
        bus.write_bytes(0x0600, program).unwrap();
        bus.write_word(INIT_VECTOR_ADDR, 0x0600).unwrap();
        bus.write_word(INTERRUPT_VECTOR_ADDR, 0x8000).unwrap();
        bus.write_word(NMI_VECTOR_ADDR, 0x9000).unwrap();

        Cpu::new(bus).unwrap()
    }

    #[test]
    fn test_reset() {
        let cpu = get_cpu(&[]);
        assert_eq!(0x0600, cpu.registers.command_pointer.get());
        assert_eq!(0xfd, cpu.registers.stack_pointer.get());
        assert_eq!(0x24, cpu.registers.status.get());
        assert_eq!(0, cpu.total_cycles());
        assert_eq!(0, cpu.instructions_executed());
    }

    #[test]
    fn test_reset_vector_must_be_mapped() {
        let mut bus = Bus::default();
        bus.connect("RAM", 0x0000, 0x7fff, RAM::default()).unwrap();
        assert_eq!(
            CpuError::Memory(MemoryError::Unmapped(0xfffc)),
            Cpu::new(bus).unwrap_err()
        );
    }

    #[test]
    fn test_reset_from_rom() {
        let mut bus = Bus::default();
        bus.connect("RAM", 0x0000, 0x7fff, RAM::default()).unwrap();
        bus.connect("ROM", 0xfffa, 0xffff, ROM::new(0xfffa, vec![0x00, 0x90, 0x00, 0xc0, 0x00, 0x80]))
            .unwrap();
        let cpu = Cpu::new(bus).unwrap();
        assert_eq!(0xc000, cpu.registers.command_pointer.get());
    }

    #[test]
    fn test_step() {
        let mut cpu = get_cpu(&[0xa9, 0x2a, 0xaa]);
        assert_eq!(2, cpu.step().unwrap());
        assert_eq!(0x2a, cpu.registers.accumulator.get());
        assert_eq!(2, cpu.step().unwrap());
        assert_eq!(0x2a, cpu.registers.register_x.get());
        assert_eq!(0x0603, cpu.registers.command_pointer.get());
        assert_eq!(4, cpu.total_cycles());
        assert_eq!(2, cpu.current_cycles());
        assert_eq!(2, cpu.instructions_executed());
    }

    #[test]
    fn test_unknown_opcode_is_skipped() {
        let mut cpu = get_cpu(&[0x02, 0xe8]);
        assert_eq!(2, cpu.step().unwrap());
        assert_eq!(0x0601, cpu.registers.command_pointer.get());
        assert_eq!(1, cpu.instructions_executed());
        cpu.step().unwrap();
        assert_eq!(0x01, cpu.registers.register_x.get());
    }

    #[test]
    fn test_unknown_opcode_policy() {
        let mut bus = Bus::with_ram();
        bus.write(0x0600, 0xff).unwrap();
        bus.write_word(INIT_VECTOR_ADDR, 0x0600).unwrap();
        let config = CpuConfig::default()
            .with_unknown_opcode(UnknownOpcodePolicy::Halt)
            .with_unknown_opcode_cycles(3);
        let mut cpu = Cpu::with_config(bus, config).unwrap();
        assert_eq!(
            Err(CpuError::IllegalOpcode {
                opcode: 0xff,
                address: 0x0600
            }),
            cpu.step()
        );
        assert_eq!(0x0601, cpu.registers.command_pointer.get());
        assert_eq!(0, cpu.total_cycles());
    }

    #[test]
    fn test_halt_clears_current_cycles() {
        let mut bus = Bus::with_ram();
        bus.write_word(INIT_VECTOR_ADDR, 0x0600).unwrap();
        bus.write_bytes(0x0600, &[0xad, 0x00, 0x02, 0x02]).unwrap();
        let config = CpuConfig::default().with_unknown_opcode(UnknownOpcodePolicy::Halt);
        let mut cpu = Cpu::with_config(bus, config).unwrap();
        assert_eq!(4, cpu.step().unwrap());
        assert!(cpu.step().is_err());
        assert_eq!(0, cpu.current_cycles());
        assert_eq!(4, cpu.total_cycles());
        assert_eq!(1, cpu.instructions_executed());
    }

    #[test]
    fn test_unknown_opcode_cycles() {
        let mut bus = Bus::with_ram();
        bus.write_word(INIT_VECTOR_ADDR, 0x0600).unwrap();
        bus.write(0x0600, 0x03).unwrap();
        let config = CpuConfig::default().with_unknown_opcode_cycles(5);
        let mut cpu = Cpu::with_config(bus, config).unwrap();
        assert_eq!(5, cpu.step().unwrap());
    }

    #[test]
    fn test_nmi() {
        let mut cpu = get_cpu(&[0xea]);
        cpu.registers.set_c_flag(true);
        cpu.registers.set_b_flag(true);
        cpu.nmi();
        assert_eq!(7, cpu.step().unwrap());
        assert_eq!(0x9000, cpu.registers.command_pointer.get());
        assert!(cpu.registers.i_flag_is_set());
        assert_eq!(0xfa, cpu.registers.stack_pointer.get());
        // B cleared in the pushed status
        assert_eq!(vec![0x25, 0x00, 0x06], cpu.bus.read_bytes(0x01fb, 3).unwrap());
        assert!(!cpu.interrupt_lines().nmi_pending());
        assert_eq!(0, cpu.instructions_executed());
        assert_eq!(7, cpu.total_cycles());
    }

    #[test]
    fn test_irq_is_masked() {
        let mut cpu = get_cpu(&[0xea, 0x58, 0xea]);
        cpu.irq();
        // I is set after reset
        assert_eq!(2, cpu.step().unwrap());
        assert_eq!(0x0601, cpu.registers.command_pointer.get());
        assert!(cpu.interrupt_lines().irq_pending());
        // CLI
        cpu.step().unwrap();
        assert_eq!(7, cpu.step().unwrap());
        assert_eq!(0x8000, cpu.registers.command_pointer.get());
        assert!(!cpu.interrupt_lines().irq_pending());
        assert_eq!(vec![0x20, 0x02, 0x06], cpu.bus.read_bytes(0x01fb, 3).unwrap());
    }

    #[test]
    fn test_nmi_has_priority() {
        let mut cpu = get_cpu(&[0x58, 0xea]);
        cpu.step().unwrap();
        let lines = cpu.interrupt_lines();
        lines.irq();
        lines.nmi();
        cpu.step().unwrap();
        assert_eq!(0x9000, cpu.registers.command_pointer.get());
        // I is now set, IRQ stays pending
        assert!(lines.irq_pending());
    }

    #[test]
    fn test_reset_clears_interrupts() {
        let mut cpu = get_cpu(&[0xea]);
        cpu.nmi();
        cpu.irq();
        cpu.reset().unwrap();
        assert!(!cpu.interrupt_lines().nmi_pending());
        assert!(!cpu.interrupt_lines().irq_pending());
    }

    #[test]
    fn test_run_stops_on_trap() {
        // LDX #$05; DEX; BNE -3; JMP $0606
        let mut cpu = get_cpu(&[0xa2, 0x05, 0xca, 0xd0, 0xfd, 0x4c, 0x05, 0x06]);
        let logs = cpu.run(100).unwrap();
        assert_eq!(0x00, cpu.registers.register_x.get());
        assert_eq!(0x0605, cpu.registers.command_pointer.get());
        // LDX + 5 * DEX + 5 * BNE + JMP
        assert_eq!(12, logs.len());
        assert_eq!(2 + 5 * 2 + 4 * 3 + 2 + 3, cpu.total_cycles());
    }

    #[test]
    fn test_run_max_steps() {
        let mut cpu = get_cpu(&[0xe8, 0xe8, 0xe8, 0xe8]);
        let logs = cpu.run(2).unwrap();
        assert_eq!(2, logs.len());
        assert_eq!(0x02, cpu.registers.register_x.get());
    }

    #[test]
    fn test_run_for_cycles() {
        let mut cpu = get_cpu(&[0xea; 16]);
        assert_eq!(10, cpu.run_for_cycles(9).unwrap());
        assert_eq!(5, cpu.instructions_executed());
    }

    #[test]
    fn test_display() {
        let mut cpu = get_cpu(&[0xa9, 0x2a]);
        cpu.step().unwrap();
        assert_eq!(
            "A=2A X=00 Y=00 PC=0602 SP=FD P=24 [nv-bdIzc] CYC=2",
            cpu.to_string()
        );
    }

    #[test]
    fn test_memory_errors_are_surfaced() {
        let mut bus = Bus::default();
        bus.connect("RAM", 0x0000, 0x7fff, RAM::default()).unwrap();
        bus.connect("ROM", 0xfffc, 0xfffd, ROM::new(0xfffc, vec![0x00, 0x06]))
            .unwrap();
        bus.write_bytes(0x0600, &[0xad, 0x00, 0x90]).unwrap();
        let mut cpu = Cpu::new(bus).unwrap();
        assert_eq!(
            Err(CpuError::Microcode(MicrocodeError::Memory(MemoryError::Unmapped(0x9000)))),
            cpu.step()
        );
    }
}
