// x86-64 emitter support: the register file and allocation-policy model
// consumed by the register allocator and the instruction emitter.

mod info;
mod register;

pub use info::{ARGUMENT_SLOT_COUNT, RegisterDescriptor, RegisterInfo};
pub use register::{Register, RegisterKind};
