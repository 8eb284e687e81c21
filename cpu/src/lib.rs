//! The 16-bit real-mode instruction core: register/flag state, ModR/M
//! effective-address computation, and fetch/decode/execute for the
//! instruction subset this scaffold supports (§3, §4).
//!
//! This crate owns no memory. Every function that touches guest RAM takes
//! it by reference (directly, or through `ExecContext`) so a `vm::Vm` can
//! hold memory and CPU state as separate, independently lifetimed pieces —
//! there is deliberately no `Cpu::memory` field here.

mod addr;
mod context;
mod decode;
mod fetch;
mod flags;
mod handlers;
mod modrm;
mod state;
mod status;

pub use addr::linear;
pub use context::ExecContext;
pub use decode::{decode, drain_prefixes, DecodeError, Group1Op, Handler};
pub use flags::Flags;
pub use modrm::{ModRm, RmOperand};
pub use state::{CpuState, DefaultSegment, AX, BP, BX, CS, CX, DI, DS, DX, ES, SI, SP, SS};
pub use status::Status;

use mem::Memory;

/// Executes an already-decoded instruction. Exposed so `vm::Vm::step` can
/// hook trace points between decode and execute; `step` below calls the
/// same function internally.
pub fn execute(ctx: &mut ExecContext, handler: Handler) -> Status {
    handlers::execute(ctx, handler)
}

/// Runs exactly one instruction against `cpu`/`mem`: clears per-instruction
/// latches, drains prefix bytes, decodes the opcode, and executes it
/// (§4.1). A halted CPU is a no-op that returns `Status::Halted` without
/// touching CS:IP (property 5) — callers that want that check folded in
/// typically go through `vm::Vm::step` instead, which also drives trace
/// hooks.
pub fn step(cpu: &mut CpuState, mem: &mut Memory) -> Status {
    if cpu.halted {
        return Status::Halted;
    }

    cpu.begin_instruction();

    if let Err(fault) = drain_prefixes(cpu, mem) {
        return Status::Faulted(fault);
    }

    let handler = match decode(cpu, mem) {
        Ok(handler) => handler,
        Err(DecodeError::Fault(fault)) => return Status::Faulted(fault),
        Err(DecodeError::InvalidOpcode(opcode)) => return Status::InvalidOpcode { opcode },
    };

    let mut ctx = ExecContext::new(cpu, mem);
    handlers::execute(&mut ctx, handler)
}
