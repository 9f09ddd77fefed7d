//! The register catalog: single source of truth for the ABI and runtime
//! classification of every physical register.
//!
//! Built once from a fixed hand-authored table and never mutated. The
//! allocator and the emitter query it by [`Register`] handle; neither
//! holds classification data of its own. Every lookup is a plain read, so
//! the catalog is freely shared across threads compiling independent
//! functions.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::register::{Register, RegisterKind};
use crate::error::{Error, Result};

/// Number of positional arguments passed in registers.
///
/// Two more than the platform C ABI's six: the compiler's own convention
/// additionally uses r10 and r11 as argument slots 6 and 7.
pub const ARGUMENT_SLOT_COUNT: usize = 8;

/// ABI/runtime classification of one physical register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Zero-based calling-convention argument slot bound to this register,
    /// or `None` if it never passes a positional argument.
    pub argument_slot: Option<u8>,
    /// A function that clobbers this register must save and restore it
    /// around its own body.
    pub callee_saved: bool,
    /// Permanently bound to a runtime-internal role and never visible to
    /// the allocator.
    pub reserved: bool,
    /// Canonical lowercase mnemonic used in diagnostics and listings.
    pub name: &'static str,
}

const fn desc(
    argument_slot: Option<u8>,
    callee_saved: bool,
    reserved: bool,
    name: &'static str,
) -> RegisterDescriptor {
    RegisterDescriptor {
        argument_slot,
        callee_saved,
        reserved,
        name,
    }
}

/// The fixed classification table, indexed by [`Register::id`].
///
/// The runtime permanently binds r13 to the current-process context, r14
/// to the global symbol table and r15 to the data-segment offset; together
/// with rsp they are reserved and never reach the allocator. r10 and r11
/// are argument slots of the compiler's own convention and callee-saved
/// under it, unlike the platform C ABI.
const DESCRIPTORS: [RegisterDescriptor; Register::COUNT] = [
    desc(None, false, false, "rax"),
    desc(Some(3), false, false, "rcx"),
    desc(Some(2), false, false, "rdx"),
    desc(None, true, false, "rbx"),
    desc(None, false, true, "rsp"),
    desc(None, true, false, "rbp"),
    desc(Some(1), false, false, "rsi"),
    desc(Some(0), false, false, "rdi"),
    desc(Some(4), false, false, "r8"),
    desc(Some(5), false, false, "r9"),
    desc(Some(6), true, false, "r10"),
    desc(Some(7), true, false, "r11"),
    desc(None, true, false, "r12"),
    desc(None, false, true, "r13"),
    desc(None, false, true, "r14"),
    desc(None, false, true, "r15"),
    desc(None, false, false, "xmm0"),
    desc(None, false, false, "xmm1"),
    desc(None, false, false, "xmm2"),
    desc(None, false, false, "xmm3"),
    desc(None, false, false, "xmm4"),
    desc(None, false, false, "xmm5"),
    desc(None, false, false, "xmm6"),
    desc(None, false, false, "xmm7"),
    desc(None, true, false, "xmm8"),
    desc(None, true, false, "xmm9"),
    desc(None, true, false, "xmm10"),
    desc(None, true, false, "xmm11"),
    desc(None, true, false, "xmm12"),
    desc(None, true, false, "xmm13"),
    desc(None, true, false, "xmm14"),
    desc(None, true, false, "xmm15"),
];

// ── Allocation-order policy ──

/// Preference order for the main allocation pass, integer class.
///
/// Excludes the four reserved registers; r12 is withheld and kept back for
/// spill temporaries.
const GPR_ALLOC_ORDER: [Register; 11] = [
    Register::Rax,
    Register::Rcx,
    Register::Rdx,
    Register::Rbx,
    Register::Rbp,
    Register::Rsi,
    Register::Rdi,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
];

/// Preference order for the main allocation pass, vector class.
///
/// Caller-saved registers first, then the callee-saved sub-range; xmm15 is
/// withheld for spill temporaries.
const XMM_ALLOC_ORDER: [Register; 15] = [
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
];

/// Spill-temporary preference order, integer class: the primary order plus
/// r12. Spill temporaries live only a few instructions, so they may use
/// the register the primary pass avoids.
const GPR_SPILL_TEMP_ALLOC_ORDER: [Register; 12] = [
    Register::Rax,
    Register::Rcx,
    Register::Rdx,
    Register::Rbx,
    Register::Rbp,
    Register::Rsi,
    Register::Rdi,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
    Register::R12,
];

/// Spill-temporary preference order, vector class: the primary order plus
/// xmm15.
const XMM_SPILL_TEMP_ALLOC_ORDER: [Register; 16] = [
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

// ── Callee-saved save lists ──

/// Prologue/epilogue save order, integer class.
const SAVED_GPRS: [Register; 5] = [
    Register::Rbx,
    Register::Rbp,
    Register::R10,
    Register::R11,
    Register::R12,
];

/// Prologue/epilogue save order, vector class.
const SAVED_XMMS: [Register; 8] = [
    Register::Xmm8,
    Register::Xmm9,
    Register::Xmm10,
    Register::Xmm11,
    Register::Xmm12,
    Register::Xmm13,
    Register::Xmm14,
    Register::Xmm15,
];

const SAVED_COUNT: usize = SAVED_GPRS.len() + SAVED_XMMS.len();

/// The register catalog and derived calling-convention and
/// allocation-policy lists.
///
/// Build one with [`RegisterInfo::new`], or share the process-wide
/// instance from [`RegisterInfo::instance`].
#[derive(Debug, PartialEq, Eq)]
pub struct RegisterInfo {
    descriptors: [RegisterDescriptor; Register::COUNT],
    arg_regs: [Register; ARGUMENT_SLOT_COUNT],
    saved_all: [Register; SAVED_COUNT],
    gpr_alloc_order: &'static [Register],
    xmm_alloc_order: &'static [Register],
    gpr_spill_temp_alloc_order: &'static [Register],
    xmm_spill_temp_alloc_order: &'static [Register],
    saved_gprs: &'static [Register],
    saved_xmms: &'static [Register],
}

impl RegisterInfo {
    /// Build the catalog from the fixed table and validate it.
    ///
    /// # Panics
    ///
    /// Panics if the table violates a catalog invariant: duplicate or
    /// non-lowercase names, non-dense argument slots, a reserved register
    /// in an order list, a register both reserved and callee-saved, or a
    /// malformed order or save list. An inconsistent register model would
    /// silently produce incorrect machine code, so startup aborts instead.
    pub fn new() -> Self {
        let descriptors = DESCRIPTORS;

        // The argument-register list is derived from the descriptors, not
        // authored next to them, so the two cannot disagree.
        let mut slots: [Option<Register>; ARGUMENT_SLOT_COUNT] = [None; ARGUMENT_SLOT_COUNT];
        for reg in Register::ALL {
            if let Some(slot) = descriptors[reg.id() as usize].argument_slot {
                let entry = slots.get_mut(usize::from(slot)).unwrap_or_else(|| {
                    panic!("register catalog: argument slot {slot} is out of range")
                });
                assert!(
                    entry.is_none(),
                    "register catalog: argument slot {slot} is bound twice"
                );
                *entry = Some(reg);
            }
        }
        let arg_regs = slots.map(|reg| {
            reg.unwrap_or_else(|| panic!("register catalog: argument slots are not dense"))
        });

        let mut saved_all = [Register::Rbx; SAVED_COUNT];
        saved_all[..SAVED_GPRS.len()].copy_from_slice(&SAVED_GPRS);
        saved_all[SAVED_GPRS.len()..].copy_from_slice(&SAVED_XMMS);

        let info = Self {
            descriptors,
            arg_regs,
            saved_all,
            gpr_alloc_order: &GPR_ALLOC_ORDER,
            xmm_alloc_order: &XMM_ALLOC_ORDER,
            gpr_spill_temp_alloc_order: &GPR_SPILL_TEMP_ALLOC_ORDER,
            xmm_spill_temp_alloc_order: &XMM_SPILL_TEMP_ALLOC_ORDER,
            saved_gprs: &SAVED_GPRS,
            saved_xmms: &SAVED_XMMS,
        };
        info.validate();

        tracing::debug!(
            gprs = Register::GPR_COUNT,
            xmms = Register::XMM_COUNT,
            argument_slots = ARGUMENT_SLOT_COUNT,
            "register catalog built"
        );

        info
    }

    /// The process-wide catalog, built on first use and immutable
    /// afterward.
    pub fn instance() -> &'static Self {
        static INSTANCE: LazyLock<RegisterInfo> = LazyLock::new(RegisterInfo::new);
        &INSTANCE
    }

    // ── Catalog lookups (total over the enumeration) ──

    /// Classification of `reg`.
    pub fn describe(&self, reg: Register) -> &RegisterDescriptor {
        &self.descriptors[reg.id() as usize]
    }

    /// Class of `reg`, derived from which sub-range of the enumeration it
    /// occupies.
    pub fn class_of(&self, reg: Register) -> RegisterKind {
        reg.kind()
    }

    /// Canonical lowercase mnemonic of `reg`.
    pub fn name_of(&self, reg: Register) -> &'static str {
        self.describe(reg).name
    }

    // ── Calling-convention slots ──

    /// The register holding positional argument `slot`.
    ///
    /// # Errors
    ///
    /// Fails for `slot >= ARGUMENT_SLOT_COUNT`; arguments past the last
    /// register slot are lowered to a stack convention outside this model.
    pub fn argument_register(&self, slot: usize) -> Result<Register> {
        self.arg_regs.get(slot).copied().ok_or(Error::NoSuchArgumentSlot {
            slot,
            limit: ARGUMENT_SLOT_COUNT,
        })
    }

    pub fn argument_slot_count(&self) -> usize {
        self.arg_regs.len()
    }

    // ── Allocation-order policy ──

    /// Preference order for the main allocation pass, integer class.
    pub fn gpr_alloc_order(&self) -> &[Register] {
        self.gpr_alloc_order
    }

    /// Preference order for the main allocation pass, vector class.
    pub fn xmm_alloc_order(&self) -> &[Register] {
        self.xmm_alloc_order
    }

    /// Preference order for spill-temporary materialization, integer
    /// class. A superset of [`Self::gpr_alloc_order`].
    pub fn gpr_spill_temp_alloc_order(&self) -> &[Register] {
        self.gpr_spill_temp_alloc_order
    }

    /// Preference order for spill-temporary materialization, vector class.
    /// A superset of [`Self::xmm_alloc_order`].
    pub fn xmm_spill_temp_alloc_order(&self) -> &[Register] {
        self.xmm_spill_temp_alloc_order
    }

    // ── Callee-saved save lists ──

    /// Callee-saved integer registers in prologue save order.
    pub fn callee_saved_gprs(&self) -> &[Register] {
        self.saved_gprs
    }

    /// Callee-saved vector registers in prologue save order.
    pub fn callee_saved_xmms(&self) -> &[Register] {
        self.saved_xmms
    }

    /// Callee-saved registers of both classes, integer registers first.
    pub fn callee_saved_all(&self) -> &[Register] {
        &self.saved_all
    }

    // ── Construction-time validation ──
    //
    // Validation messages format registers with `Debug`: `Display` goes
    // through `RegisterInfo::instance`, which may be mid-construction on
    // this very thread.

    fn validate(&self) {
        self.check_names();
        self.check_flags();
        self.check_order_list("gpr primary order", RegisterKind::Gpr, self.gpr_alloc_order);
        self.check_order_list("xmm primary order", RegisterKind::Xmm, self.xmm_alloc_order);
        self.check_order_list(
            "gpr spill-temporary order",
            RegisterKind::Gpr,
            self.gpr_spill_temp_alloc_order,
        );
        self.check_order_list(
            "xmm spill-temporary order",
            RegisterKind::Xmm,
            self.xmm_spill_temp_alloc_order,
        );
        self.check_spill_coverage(
            RegisterKind::Gpr,
            self.gpr_alloc_order,
            self.gpr_spill_temp_alloc_order,
        );
        self.check_spill_coverage(
            RegisterKind::Xmm,
            self.xmm_alloc_order,
            self.xmm_spill_temp_alloc_order,
        );
        self.check_saved_list(RegisterKind::Gpr, self.saved_gprs);
        self.check_saved_list(RegisterKind::Xmm, self.saved_xmms);
    }

    fn check_names(&self) {
        let mut seen = HashSet::new();
        for reg in Register::ALL {
            let name = self.describe(reg).name;
            assert!(!name.is_empty(), "register catalog: {reg:?} has no name");
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "register catalog: {name:?} is not a lowercase mnemonic"
            );
            assert!(seen.insert(name), "register catalog: duplicate name {name:?}");
        }
    }

    fn check_flags(&self) {
        for reg in Register::ALL {
            let d = self.describe(reg);
            assert!(
                !(d.reserved && d.callee_saved),
                "register catalog: {reg:?} is both reserved and callee-saved"
            );
            assert!(
                !(d.reserved && d.argument_slot.is_some()),
                "register catalog: reserved register {reg:?} has an argument slot"
            );
        }
    }

    fn check_order_list(&self, label: &str, kind: RegisterKind, list: &[Register]) {
        let mut seen = HashSet::new();
        for &reg in list {
            assert_eq!(reg.kind(), kind, "{label}: {reg:?} is not a {kind} register");
            assert!(
                !self.describe(reg).reserved,
                "{label}: contains reserved register {reg:?}"
            );
            assert!(seen.insert(reg), "{label}: duplicate entry {reg:?}");
        }
    }

    fn check_spill_coverage(&self, kind: RegisterKind, primary: &[Register], spill: &[Register]) {
        for &reg in primary {
            assert!(
                spill.contains(&reg),
                "{kind} spill-temporary order does not contain {reg:?}"
            );
        }
        for reg in Register::ALL {
            if reg.kind() == kind && !self.describe(reg).reserved {
                assert!(
                    spill.contains(&reg),
                    "non-reserved register {reg:?} is missing from the {kind} spill-temporary order"
                );
            }
        }
    }

    fn check_saved_list(&self, kind: RegisterKind, list: &[Register]) {
        let mut seen = HashSet::new();
        for &reg in list {
            let d = self.describe(reg);
            assert_eq!(reg.kind(), kind, "{kind} save list: {reg:?} has the wrong class");
            assert!(
                d.callee_saved && !d.reserved,
                "{kind} save list: {reg:?} is not callee-saved"
            );
            assert!(seen.insert(reg), "{kind} save list: duplicate entry {reg:?}");
        }
        for reg in Register::ALL {
            if reg.kind() == kind && self.describe(reg).callee_saved {
                assert!(
                    list.contains(&reg),
                    "callee-saved register {reg:?} is missing from the {kind} save list"
                );
            }
        }
    }
}

impl Default for RegisterInfo {
    fn default() -> Self {
        Self::new()
    }
}
