use remain::sorted;
use thiserror::Error;

/// Host-driver-level failures: VM lifecycle and registry operations.
///
/// Per-instruction execution outcomes (a guest fetching off the end of its
/// RAM, hitting an unimplemented opcode, ...) are deliberately *not* modeled
/// here — those are first-class results of stepping a guest and are reported
/// through `Status` instead, the same way a real CPU's exception is a normal
/// outcome rather than a host failure.
#[sorted]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("failed to allocate {requested} bytes of guest RAM")]
    AllocationFailed { requested: usize },
    #[error("requested RAM size {requested} is below the minimum of {minimum} bytes")]
    RamTooSmall { requested: usize, minimum: usize },
    #[error("no vm slot available (capacity {capacity})")]
    SlotsExhausted { capacity: usize },
    #[error("no vm with id {id}")]
    UnknownVm { id: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
