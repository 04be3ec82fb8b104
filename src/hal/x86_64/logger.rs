//! Serial-backed `log` implementation, installed once by [`super::init`].
//!
//! Grounded in the teacher's `CluuLogger` (`utils::debug::logger` in
//! earlier revisions of this tree): same shape, a zero-sized `Log` impl
//! that writes every record straight through the board's serial port,
//! with the teacher's `serial_println!` macro replaced by
//! [`super::serial::write_fmt`] since nothing else needs to share that
//! macro here.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            super::serial::write_fmt(format_args!("[{}] {}\n", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Install the global logger. Must be called exactly once, before any
/// other `hal::x86_64` init step that might log.
pub fn init() {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Info))
        .expect("logger already installed");
}
