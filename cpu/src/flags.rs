use bitflags::bitflags;

bitflags! {
    /// The 16-bit real-mode FLAGS register (§3). Bit positions match the
    /// architectural layout; only the bits this scaffold touches are named.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u16 {
        const CF = 1 << 0;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const TF = 1 << 8;
        const IF = 1 << 9;
        const DF = 1 << 10;
        const OF = 1 << 11;
        /// Bit 1 is architecturally reserved and always reads as 1.
        const RESERVED_1 = 1 << 1;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::RESERVED_1
    }
}

/// The set of status flags one ALU operation computes (§4.7). AF is
/// deliberately absent: this scaffold does not compute it (DESIGN.md, Open
/// Question 2) and always clears it instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub result: u16,
    pub cf: bool,
    pub zf: bool,
    pub sf: bool,
    pub of: bool,
    pub pf: bool,
}

fn parity_even(byte: u8) -> bool {
    byte.count_ones() % 2 == 0
}

fn zf_sf_pf(result: u16) -> (bool, bool, bool) {
    (result == 0, (result & 0x8000) != 0, parity_even(result as u8))
}

/// `dst + src`, no carry in.
pub fn add16(dst: u16, src: u16) -> AluResult {
    let sum = dst as u32 + src as u32;
    let result = sum as u16;
    let (zf, sf, pf) = zf_sf_pf(result);
    let of = ((!(dst ^ src)) & (dst ^ result) & 0x8000) != 0;
    AluResult {
        result,
        cf: sum > 0xFFFF,
        zf,
        sf,
        of,
        pf,
    }
}

/// `dst + src + cf_in`, carry computed over the 17-bit sum.
pub fn adc16(dst: u16, src: u16, cf_in: bool) -> AluResult {
    let carry_in = cf_in as u32;
    let sum = dst as u32 + src as u32 + carry_in;
    let result = sum as u16;
    let (zf, sf, pf) = zf_sf_pf(result);
    let eff_src = src.wrapping_add(carry_in as u16);
    let of = ((!(dst ^ eff_src)) & (dst ^ result) & 0x8000) != 0;
    AluResult {
        result,
        cf: sum > 0xFFFF,
        zf,
        sf,
        of,
        pf,
    }
}

/// `dst - src` (also used for CMP, which discards `result` and keeps only
/// the flags).
pub fn sub16(dst: u16, src: u16) -> AluResult {
    let result = dst.wrapping_sub(src);
    let (zf, sf, pf) = zf_sf_pf(result);
    let of = ((dst ^ src) & (dst ^ result) & 0x8000) != 0;
    AluResult {
        result,
        cf: dst < src,
        zf,
        sf,
        of,
        pf,
    }
}
