use mem::Memory;

use crate::modrm::{effective_address, RmOperand};
use crate::state::CpuState;

/// Bundles the pieces a handler needs to execute one instruction: the
/// guest's registers/flags and the guest's memory. Handlers never see a
/// `vm::Vm` directly — this is the narrow seam between the two crates.
pub struct ExecContext<'a> {
    pub cpu: &'a mut CpuState,
    pub mem: &'a mut Memory,
}

impl<'a> ExecContext<'a> {
    pub fn new(cpu: &'a mut CpuState, mem: &'a mut Memory) -> Self {
        ExecContext { cpu, mem }
    }

    pub fn read_rm16(&self, rm: RmOperand) -> mem::Result<u16> {
        match rm {
            RmOperand::Register(index) => Ok(self.cpu.reg16(index)),
            RmOperand::Memory { offset, default_segment } => {
                self.mem.read16(effective_address(self.cpu, offset, default_segment))
            }
        }
    }

    /// Writes the destination named by `rm`. Memory writes are attempted
    /// before the caller updates flags (§5's fault-safety ordering) —
    /// callers must call this before committing any flag changes so a fault
    /// here leaves flags untouched.
    pub fn write_rm16(&mut self, rm: RmOperand, value: u16) -> mem::Result<()> {
        match rm {
            RmOperand::Register(index) => {
                self.cpu.set_reg16(index, value);
                Ok(())
            }
            RmOperand::Memory { offset, default_segment } => {
                let addr = effective_address(self.cpu, offset, default_segment);
                self.mem.write16(addr, value)
            }
        }
    }
}
