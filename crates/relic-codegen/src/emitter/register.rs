//! Physical register identities for the x86-64 target.
//!
//! `Register` is the vocabulary type shared between the register catalog,
//! the allocator, and the instruction emitter. A handle identifies exactly
//! one physical register; all classification lives in [`RegisterInfo`].

use std::fmt;

use super::info::RegisterInfo;

/// Register class: integer/pointer registers or 128-bit SIMD registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterKind {
    Gpr,
    Xmm,
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterKind::Gpr => f.write_str("gpr"),
            RegisterKind::Xmm => f.write_str("xmm"),
        }
    }
}

/// One physical register. GPRs occupy ids 0..16 in hardware encoding
/// order, XMMs ids 16..32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Register {
    Rax = 0,
    Rcx = 1,
    Rdx = 2,
    Rbx = 3,
    Rsp = 4,
    Rbp = 5,
    Rsi = 6,
    Rdi = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
    Xmm0 = 16,
    Xmm1 = 17,
    Xmm2 = 18,
    Xmm3 = 19,
    Xmm4 = 20,
    Xmm5 = 21,
    Xmm6 = 22,
    Xmm7 = 23,
    Xmm8 = 24,
    Xmm9 = 25,
    Xmm10 = 26,
    Xmm11 = 27,
    Xmm12 = 28,
    Xmm13 = 29,
    Xmm14 = 30,
    Xmm15 = 31,
}

impl Register {
    pub const GPR_COUNT: usize = 16;
    pub const XMM_COUNT: usize = 16;
    pub const COUNT: usize = Self::GPR_COUNT + Self::XMM_COUNT;

    /// The integer class, in id order.
    pub const GPRS: [Register; Self::GPR_COUNT] = [
        Register::Rax,
        Register::Rcx,
        Register::Rdx,
        Register::Rbx,
        Register::Rsp,
        Register::Rbp,
        Register::Rsi,
        Register::Rdi,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
        Register::R15,
    ];

    /// The vector class, in id order.
    pub const XMMS: [Register; Self::XMM_COUNT] = [
        Register::Xmm0,
        Register::Xmm1,
        Register::Xmm2,
        Register::Xmm3,
        Register::Xmm4,
        Register::Xmm5,
        Register::Xmm6,
        Register::Xmm7,
        Register::Xmm8,
        Register::Xmm9,
        Register::Xmm10,
        Register::Xmm11,
        Register::Xmm12,
        Register::Xmm13,
        Register::Xmm14,
        Register::Xmm15,
    ];

    /// The whole enumeration: every GPR followed by every XMM.
    pub const ALL: [Register; Self::COUNT] = [
        Register::Rax,
        Register::Rcx,
        Register::Rdx,
        Register::Rbx,
        Register::Rsp,
        Register::Rbp,
        Register::Rsi,
        Register::Rdi,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
        Register::R12,
        Register::R13,
        Register::R14,
        Register::R15,
        Register::Xmm0,
        Register::Xmm1,
        Register::Xmm2,
        Register::Xmm3,
        Register::Xmm4,
        Register::Xmm5,
        Register::Xmm6,
        Register::Xmm7,
        Register::Xmm8,
        Register::Xmm9,
        Register::Xmm10,
        Register::Xmm11,
        Register::Xmm12,
        Register::Xmm13,
        Register::Xmm14,
        Register::Xmm15,
    ];

    /// Stable id over the whole enumeration.
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn kind(self) -> RegisterKind {
        if (self as usize) < Self::GPR_COUNT {
            RegisterKind::Gpr
        } else {
            RegisterKind::Xmm
        }
    }

    pub const fn is_gpr(self) -> bool {
        matches!(self.kind(), RegisterKind::Gpr)
    }

    pub const fn is_xmm(self) -> bool {
        matches!(self.kind(), RegisterKind::Xmm)
    }

    /// Hardware index within the register's own class (0..16).
    pub const fn hw_index(self) -> u8 {
        let id = self as u8;
        if self.is_gpr() { id } else { id - 16 }
    }

    /// Split the hardware index into the extension bit and the low three
    /// bits, the form the instruction encoder consumes (REX prefix bit
    /// plus ModRM/SIB register field).
    pub const fn encoding(self) -> (bool, u8) {
        let hw = self.hw_index();
        (hw >= 8, hw & 0b111)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(RegisterInfo::instance().name_of(*self))
    }
}
