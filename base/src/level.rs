/// Severity of a single log/trace record, ordered least to most severe.
///
/// Mirrors `log::Level` one-for-one; kept as our own type so the `LogSink`
/// trait in this crate doesn't force every caller to depend on `log`'s
/// exact enum shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    pub fn as_log(self) -> log::Level {
        match self {
            Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Trace => log::Level::Trace,
        }
    }
}
