mod error;
mod level;
mod log_sink;

pub use error::{Error, Result};
pub use level::Level;
pub use log_sink::{LogCrateSink, LogSink};

pub use log::*;
