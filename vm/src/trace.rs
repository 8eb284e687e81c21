use cpu::{CpuState, Group1Op, Handler, RmOperand};

/// Full register dump attached to the pre- and post-execute trace points
/// (§4.11): every general-purpose and segment register plus flags and IP.
pub fn register_dump(cpu: &CpuState) -> String {
    format!(
        "ax={:04x} cx={:04x} dx={:04x} bx={:04x} sp={:04x} bp={:04x} si={:04x} di={:04x} \
         es={:04x} cs={:04x} ss={:04x} ds={:04x} ip={:04x} flags={:04x}",
        cpu.reg16(cpu::AX),
        cpu.reg16(cpu::CX),
        cpu.reg16(cpu::DX),
        cpu.reg16(cpu::BX),
        cpu.reg16(cpu::SP),
        cpu.reg16(cpu::BP),
        cpu.reg16(cpu::SI),
        cpu.reg16(cpu::DI),
        cpu.seg(cpu::ES),
        cpu.seg(cpu::CS),
        cpu.seg(cpu::SS),
        cpu.seg(cpu::DS),
        cpu.ip,
        cpu.flags.bits(),
    )
}

/// Renders a byte window (as read by `Memory::window`) as hex pairs, for the
/// pre-decode trace point (§4.11).
pub fn hex_window(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

/// Renders a decoded instruction as a short mnemonic/operand string for
/// trace output (§4.11). Deliberately not a disassembler: every branch is a
/// fixed string for the one instruction form this scaffold knows, not a
/// table-driven decoder over the full opcode map.
pub fn describe(handler: &Handler) -> String {
    match handler {
        Handler::Nop => "NOP".to_string(),
        Handler::Hlt => "HLT".to_string(),
        Handler::MovR16Imm16 { reg, imm16 } => format!("MOV {}, {imm16:#06x}", register_name(*reg)),
        Handler::Group1 { op, rm, imm8 } => {
            format!("{} {}, {:#04x}", group1_mnemonic(*op), describe_rm(rm.rm), imm8)
        }
        Handler::Int(vector) => format!("INT {vector:#04x}"),
    }
}

fn group1_mnemonic(op: Group1Op) -> &'static str {
    match op {
        Group1Op::Add => "ADD",
        Group1Op::Adc => "ADC",
        Group1Op::Sub => "SUB",
        Group1Op::Cmp => "CMP",
    }
}

fn describe_rm(rm: RmOperand) -> String {
    match rm {
        RmOperand::Register(index) => register_name(index).to_string(),
        RmOperand::Memory { offset, .. } => format!("[{offset:#06x}]"),
    }
}

fn register_name(index: usize) -> &'static str {
    match index {
        cpu::AX => "AX",
        cpu::CX => "CX",
        cpu::DX => "DX",
        cpu::BX => "BX",
        cpu::SP => "SP",
        cpu::BP => "BP",
        cpu::SI => "SI",
        cpu::DI => "DI",
        _ => "?",
    }
}
