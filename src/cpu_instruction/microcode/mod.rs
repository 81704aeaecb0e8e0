mod error;
pub use error::{MicrocodeError, Result};

mod arithmetic;
mod branch;
mod compare;
mod flags;
mod inc_dec;
mod jump;
mod load_store;
mod logical;
mod shift;
mod stack;
mod system;
mod transfer;

pub use arithmetic::{adc, sbc};
pub use branch::{bcc, bcs, beq, bmi, bne, bpl, bvc, bvs};
pub use compare::{cmp, cpx, cpy};
pub use flags::{clc, cld, cli, clv, sec, sed, sei};
pub use inc_dec::{dec, dex, dey, inc, inx, iny};
pub use jump::{jmp, jsr, rts};
pub use load_store::{lda, ldx, ldy, sta, stx, sty};
pub use logical::{and, bit, eor, ora};
pub use shift::{asl, lsr, rol, ror};
pub use stack::{pha, php, pla, plp};
pub use system::{brk, nop, rti};
pub use transfer::{tax, tay, tsx, txa, txs, tya};

use super::cpu_instruction::{CPUInstruction, LogLine};
use crate::addressing_mode::{AddressingMode, AddressingModeResolution};
use crate::memory::Bus;
use crate::registers::{Registers, StatusRegister};

/*
 * Every microcode runs with the command pointer sitting on the first operand
 * byte. It resolves its operand, does its job and leaves the command pointer
 * on the next instruction. The returned LogLine carries the cycles spent.
 */

fn target_address(
    cpu_instruction: &CPUInstruction,
    resolution: &AddressingModeResolution,
) -> Result<u16> {
    resolution
        .target_address
        .ok_or(MicrocodeError::NoOperand {
            mnemonic: cpu_instruction.mnemonic,
            addressing_mode: cpu_instruction.addressing_mode,
        })
}

fn read_operand(
    bus: &Bus,
    cpu_instruction: &CPUInstruction,
    resolution: &AddressingModeResolution,
) -> Result<u8> {
    Ok(bus.read(target_address(cpu_instruction, resolution)?)?)
}
