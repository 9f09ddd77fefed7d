//! Integration tests for the register catalog: classification totality,
//! calling-convention slots, the allocation-order policy, and the
//! reserved-register guarantees the allocator and emitter rely on.

use std::collections::HashSet;

use relic_codegen::{ARGUMENT_SLOT_COUNT, Error, Register, RegisterInfo, RegisterKind};

// ── Totality & partition ──

/// `describe`, `class_of` and `name_of` are total over the enumeration.
#[test]
fn classification_is_total() {
    let info = RegisterInfo::instance();
    for reg in Register::ALL {
        let desc = info.describe(reg);
        assert!(!desc.name.is_empty());
        assert_eq!(info.name_of(reg), desc.name);
        assert_eq!(info.class_of(reg), reg.kind());
    }
}

/// GPRs and XMMs partition the enumeration with no overlap or omission.
#[test]
fn classes_partition_the_enumeration() {
    let gprs: HashSet<Register> = Register::GPRS.into_iter().collect();
    let xmms: HashSet<Register> = Register::XMMS.into_iter().collect();
    assert_eq!(gprs.len(), Register::GPR_COUNT);
    assert_eq!(xmms.len(), Register::XMM_COUNT);
    assert!(gprs.is_disjoint(&xmms));

    let all: HashSet<Register> = Register::ALL.into_iter().collect();
    assert_eq!(all.len(), Register::COUNT);
    assert_eq!(all, gprs.union(&xmms).copied().collect());

    for reg in Register::GPRS {
        assert_eq!(reg.kind(), RegisterKind::Gpr);
    }
    for reg in Register::XMMS {
        assert_eq!(reg.kind(), RegisterKind::Xmm);
    }
}

// ── Calling-convention slots ──

/// Slot 0 is rdi, the first integer argument register.
#[test]
fn slot_zero_is_rdi() {
    let info = RegisterInfo::instance();
    assert_eq!(info.argument_register(0).unwrap(), Register::Rdi);
}

/// The eight register-passed slots, in calling-convention order.
#[test]
fn argument_registers_in_convention_order() {
    let info = RegisterInfo::instance();
    let expected = [
        Register::Rdi,
        Register::Rsi,
        Register::Rdx,
        Register::Rcx,
        Register::R8,
        Register::R9,
        Register::R10,
        Register::R11,
    ];
    assert_eq!(info.argument_slot_count(), expected.len());
    for (slot, reg) in expected.into_iter().enumerate() {
        assert_eq!(info.argument_register(slot).unwrap(), reg);
        assert_eq!(
            info.describe(reg).argument_slot,
            Some(u8::try_from(slot).unwrap())
        );
    }
}

/// One past the last slot is a recoverable out-of-range error.
#[test]
fn slot_past_the_end_is_an_error() {
    let info = RegisterInfo::instance();
    let err = info.argument_register(ARGUMENT_SLOT_COUNT).unwrap_err();
    assert!(matches!(err, Error::NoSuchArgumentSlot { slot: 8, limit: 8 }));
}

/// Defined argument slots are exactly 0..8, unique and gap-free.
#[test]
fn argument_slots_are_dense() {
    let info = RegisterInfo::instance();
    let mut slots: Vec<u8> = Register::ALL
        .into_iter()
        .filter_map(|reg| info.describe(reg).argument_slot)
        .collect();
    slots.sort_unstable();
    let expected: Vec<u8> = (0..u8::try_from(ARGUMENT_SLOT_COUNT).unwrap()).collect();
    assert_eq!(slots, expected);
}

// ── Allocation-order policy ──

/// Reserved registers never show up in any order list.
#[test]
fn reserved_registers_are_never_allocatable() {
    let info = RegisterInfo::instance();
    let orders = [
        info.gpr_alloc_order(),
        info.xmm_alloc_order(),
        info.gpr_spill_temp_alloc_order(),
        info.xmm_spill_temp_alloc_order(),
    ];
    for reg in Register::ALL {
        if info.describe(reg).reserved {
            for order in orders {
                assert!(!order.contains(&reg), "{reg:?} is reserved but allocatable");
            }
        }
    }
}

/// The process-context register specifically is invisible to both the
/// primary and the spill-temporary pass.
#[test]
fn process_context_register_is_invisible() {
    let info = RegisterInfo::instance();
    assert!(info.describe(Register::R13).reserved);
    assert!(!info.gpr_alloc_order().contains(&Register::R13));
    assert!(!info.gpr_spill_temp_alloc_order().contains(&Register::R13));
}

/// Every primary-order register also appears in the matching
/// spill-temporary order.
#[test]
fn spill_temporary_orders_are_supersets() {
    let info = RegisterInfo::instance();
    for reg in info.gpr_alloc_order() {
        assert!(info.gpr_spill_temp_alloc_order().contains(reg));
    }
    for reg in info.xmm_alloc_order() {
        assert!(info.xmm_spill_temp_alloc_order().contains(reg));
    }
}

/// r12 is withheld from primary allocation but available, exactly once, as
/// a spill temporary; every other non-reserved GPR is in both lists.
#[test]
fn r12_is_spill_only() {
    let info = RegisterInfo::instance();
    let primary = info.gpr_alloc_order();
    let spill = info.gpr_spill_temp_alloc_order();

    assert_eq!(primary.iter().filter(|&&reg| reg == Register::R12).count(), 0);
    assert_eq!(spill.iter().filter(|&&reg| reg == Register::R12).count(), 1);

    for reg in Register::GPRS {
        if !info.describe(reg).reserved && reg != Register::R12 {
            assert!(primary.contains(&reg));
            assert!(spill.contains(&reg));
        }
    }
}

/// xmm15 is likewise withheld from the primary vector order.
#[test]
fn xmm15_is_spill_only() {
    let info = RegisterInfo::instance();
    let primary = info.xmm_alloc_order();
    let spill = info.xmm_spill_temp_alloc_order();

    assert!(!primary.contains(&Register::Xmm15));
    assert_eq!(
        spill.iter().filter(|&&reg| reg == Register::Xmm15).count(),
        1
    );

    for reg in Register::XMMS {
        if reg != Register::Xmm15 {
            assert!(primary.contains(&reg));
            assert!(spill.contains(&reg));
        }
    }
}

/// No register is both reserved and callee-saved.
#[test]
fn reserved_and_callee_saved_are_mutually_exclusive() {
    let info = RegisterInfo::instance();
    for reg in Register::ALL {
        let desc = info.describe(reg);
        assert!(!(desc.reserved && desc.callee_saved), "{reg:?}");
    }
}

// ── Callee-saved save lists ──

/// The save lists cover exactly the callee-saved registers of each class,
/// in prologue order, GPRs first in the combined list.
#[test]
fn save_lists_cover_callee_saved_registers() {
    let info = RegisterInfo::instance();
    let expected_gprs = [
        Register::Rbx,
        Register::Rbp,
        Register::R10,
        Register::R11,
        Register::R12,
    ];
    let expected_xmms = [
        Register::Xmm8,
        Register::Xmm9,
        Register::Xmm10,
        Register::Xmm11,
        Register::Xmm12,
        Register::Xmm13,
        Register::Xmm14,
        Register::Xmm15,
    ];
    assert_eq!(info.callee_saved_gprs(), expected_gprs);
    assert_eq!(info.callee_saved_xmms(), expected_xmms);

    let combined: Vec<Register> = expected_gprs
        .into_iter()
        .chain(expected_xmms)
        .collect();
    assert_eq!(info.callee_saved_all(), combined);

    for &reg in info.callee_saved_all() {
        let desc = info.describe(reg);
        assert!(desc.callee_saved && !desc.reserved);
    }
}

// ── Names & display ──

/// Mnemonics are pairwise distinct, lowercase and human-readable.
#[test]
fn names_are_distinct_and_lowercase() {
    let info = RegisterInfo::instance();
    let names: HashSet<&str> = Register::ALL.into_iter().map(|reg| info.name_of(reg)).collect();
    assert_eq!(names.len(), Register::COUNT);
    for name in names {
        assert_eq!(name, name.to_lowercase());
    }
}

/// `Display` for a handle routes through the catalog.
#[test]
fn display_uses_catalog_names() {
    assert_eq!(Register::Rax.to_string(), "rax");
    assert_eq!(Register::R13.to_string(), "r13");
    assert_eq!(Register::Xmm15.to_string(), "xmm15");
    assert_eq!(RegisterKind::Gpr.to_string(), "gpr");
    assert_eq!(RegisterKind::Xmm.to_string(), "xmm");
}

// ── Determinism & encoding ──

/// Two independent constructions, on two threads, agree exactly, and match
/// the process-wide instance.
#[test]
fn construction_is_deterministic() {
    let a = std::thread::spawn(RegisterInfo::new).join().unwrap();
    let b = std::thread::spawn(RegisterInfo::new).join().unwrap();
    assert_eq!(a, b);
    assert_eq!(&a, RegisterInfo::instance());
}

/// The encoder's (extension bit, low bits) split reassembles to the
/// class-local hardware index.
#[test]
fn encoding_split_reassembles_hw_index() {
    for reg in Register::ALL {
        let (extended, low) = reg.encoding();
        assert!(low < 8);
        assert_eq!(u8::from(extended) * 8 + low, reg.hw_index());
    }
    assert_eq!(Register::Rax.encoding(), (false, 0));
    assert_eq!(Register::R8.encoding(), (true, 0));
    assert_eq!(Register::Xmm15.encoding(), (true, 7));
}
