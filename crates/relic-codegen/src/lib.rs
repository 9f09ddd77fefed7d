//! Native x86-64 code-generating backend for the relic recompilation
//! toolchain. The crate's core is the register file model: the catalog of
//! physical registers, their ABI/runtime classification, the
//! calling-convention slots, and the allocation-order policy lists.

pub mod emitter;
pub mod error;

pub use emitter::{ARGUMENT_SLOT_COUNT, Register, RegisterDescriptor, RegisterInfo, RegisterKind};
pub use error::{Error, Result};
