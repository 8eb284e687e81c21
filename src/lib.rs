//! Public facade over the emulator core (§2).
//!
//! A host — the interactive shell, a script driver, or anything else that
//! wants to run 16-bit real-mode code — only ever needs this crate: guest
//! memory, the instruction core, and interrupt dispatch are all reachable
//! through `vm::VmRegistry` and the few free functions re-exported below.

pub use base::{Error, Level, LogCrateSink, LogSink, Result};
pub use cpu::{DecodeError, Status};
pub use mem::{Fault, MIN_RAM_BYTES};
pub use vm::{Vm, VmConfig, VmRegistry, MAX_VMS};
