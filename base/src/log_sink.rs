use crate::Level;

/// The logging/tracing collaborator the core consumes (§6 of the design doc).
///
/// A host supplies its own `LogSink` to get file-tee, multi-destination, or
/// in-memory-buffer behavior; none of that formatting policy lives in this
/// crate. `enabled` is checked before any message is formatted so a disabled
/// level costs nothing beyond the call itself.
pub trait LogSink {
    fn enabled(&self, level: Level) -> bool;
    fn emit(&self, level: Level, subsystem: &str, message: &str);
}

/// Default sink: forwards to the `log` crate facade, so the core is useful
/// without a host-supplied sink and so its own internal diagnostics (registry
/// warnings, etc.) show up wherever the host has wired `log` to go.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn enabled(&self, level: Level) -> bool {
        log::log_enabled!(level.as_log())
    }

    fn emit(&self, level: Level, subsystem: &str, message: &str) {
        log::log!(level.as_log(), "[{subsystem}] {message}");
    }
}
