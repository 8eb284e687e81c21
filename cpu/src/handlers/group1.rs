use crate::context::ExecContext;
use crate::decode::Group1Op;
use crate::flags::{self, AluResult};
use crate::modrm::ModRm;
use crate::status::Status;

fn sign_extend_imm8(imm8: u8) -> u16 {
    (imm8 as i8) as i16 as u16
}

fn compute(op: Group1Op, dst: u16, src: u16, cf_in: bool) -> AluResult {
    match op {
        Group1Op::Add => flags::add16(dst, src),
        Group1Op::Adc => flags::adc16(dst, src, cf_in),
        Group1Op::Sub | Group1Op::Cmp => flags::sub16(dst, src),
    }
}

/// `0x83 /r, imm8`: ADD/ADC/SUB/CMP against a sign-extended 8-bit immediate
/// (§4.5). The ALU computation is pure; for the three ops that write a
/// result back, the write is attempted before flags are touched, so a fault
/// on a memory destination leaves both the destination and the flags
/// exactly as found (§5's ordering rule). CMP never writes, so its flags
/// can be applied unconditionally.
pub fn group1(ctx: &mut ExecContext, op: Group1Op, rm: ModRm, imm8: u8) -> Status {
    let dst = match ctx.read_rm16(rm.rm) {
        Ok(value) => value,
        Err(fault) => return Status::Faulted(fault),
    };
    let src = sign_extend_imm8(imm8);
    let cf_in = ctx.cpu.flags.contains(crate::flags::Flags::CF);
    let result = compute(op, dst, src, cf_in);

    if op == Group1Op::Cmp {
        ctx.cpu.apply_alu_result(result);
        return Status::Continue;
    }

    match ctx.write_rm16(rm.rm, result.result) {
        Ok(()) => {
            ctx.cpu.apply_alu_result(result);
            Status::Continue
        }
        Err(fault) => Status::Faulted(fault),
    }
}
