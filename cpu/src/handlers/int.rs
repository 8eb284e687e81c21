use crate::context::ExecContext;
use crate::flags::Flags;
use crate::state::{CS, SS};
use crate::status::Status;

/// `0xCD imm8`: software interrupt. The actual push/IVT-lookup/redirect
/// sequence lives in the `interrupts` crate, which knows nothing about
/// `CpuState` — this handler is the only place that crosses between the
/// two (§4.8).
pub fn int(ctx: &mut ExecContext, vector: u8) -> Status {
    let mut flags_bits = ctx.cpu.flags.bits();
    let mut cs = ctx.cpu.seg(CS);
    let mut ip = ctx.cpu.ip;
    let mut sp = ctx.cpu.sp();
    let ss = ctx.cpu.seg(SS);

    match interrupts::dispatch(ctx.mem, &mut flags_bits, &mut cs, &mut ip, &mut sp, ss, vector) {
        Ok(()) => {
            ctx.cpu.flags = Flags::from_bits_retain(flags_bits);
            ctx.cpu.set_seg(CS, cs);
            ctx.cpu.ip = ip;
            ctx.cpu.set_sp(sp);
            Status::Continue
        }
        Err(fault) => Status::Faulted(fault),
    }
}
