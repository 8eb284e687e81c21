use mem::Memory;

use crate::fetch::{fetch16, fetch8, peek8};
use crate::modrm::{read_modrm, ModRm};
use crate::state::CpuState;

/// The four Group-1 arithmetic operations this scaffold implements, named
/// by the `reg` field of a `0x83 /r` ModR/M byte (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group1Op {
    Add,
    Adc,
    Sub,
    Cmp,
}

impl Group1Op {
    fn from_reg_field(reg: usize) -> Option<Self> {
        match reg {
            0b000 => Some(Group1Op::Add),
            0b010 => Some(Group1Op::Adc),
            0b101 => Some(Group1Op::Sub),
            0b111 => Some(Group1Op::Cmp),
            _ => None,
        }
    }
}

/// A fully-decoded instruction, ready for `handlers` to execute (§4's
/// fetch/decode/execute split keeps this step side-effect-free beyond
/// consuming the instruction's own bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// `0x90`.
    Nop,
    /// `0xF4`.
    Hlt,
    /// `0xB8`..`0xBF`: MOV r16, imm16, register selected by the opcode's low
    /// 3 bits.
    MovR16Imm16 { reg: usize, imm16: u16 },
    /// `0x83 /r, imm8`: group-1 ALU op, imm8 sign-extended to 16 bits.
    Group1 { op: Group1Op, rm: ModRm, imm8: u8 },
    /// `0xCD imm8`: software interrupt.
    Int(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    Fault(mem::Fault),
    InvalidOpcode(u8),
}

impl From<mem::Fault> for DecodeError {
    fn from(fault: mem::Fault) -> Self {
        DecodeError::Fault(fault)
    }
}

/// Consumes every `0xF3` (REP/REPE) prefix byte at the front of the
/// instruction stream. It is the only prefix this scaffold recognizes —
/// segment overrides are reserved for future extension (§4.3) — and it
/// latches onto `cpu`, cleared again at the start of the next instruction
/// (§4.9, property 4).
pub fn drain_prefixes(cpu: &mut CpuState, mem: &Memory) -> mem::Result<()> {
    while peek8(cpu, mem)? == 0xF3 {
        fetch8(cpu, mem)?;
        cpu.rep_prefix_latch = true;
    }
    Ok(())
}

/// Decodes the instruction at CS:IP, consuming its opcode byte and every
/// operand byte (ModR/M, displacement, immediate) it carries. Must be
/// called only after `drain_prefixes`.
pub fn decode(cpu: &mut CpuState, mem: &Memory) -> Result<Handler, DecodeError> {
    let opcode = fetch8(cpu, mem)?;
    match opcode {
        0x90 => Ok(Handler::Nop),
        0xF4 => Ok(Handler::Hlt),
        0xB8..=0xBF => {
            let imm16 = fetch16(cpu, mem)?;
            Ok(Handler::MovR16Imm16 {
                reg: (opcode & 0x07) as usize,
                imm16,
            })
        }
        0x83 => {
            let rm = read_modrm(cpu, mem)?;
            let op = Group1Op::from_reg_field(rm.reg).ok_or(DecodeError::InvalidOpcode(opcode))?;
            let imm8 = fetch8(cpu, mem)?;
            Ok(Handler::Group1 { op, rm, imm8 })
        }
        0xCD => {
            let vector = fetch8(cpu, mem)?;
            Ok(Handler::Int(vector))
        }
        other => Err(DecodeError::InvalidOpcode(other)),
    }
}
