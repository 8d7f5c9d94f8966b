/*
 * log backend
 *
 * Renders `log` records as single lines on a CharSink:
 *   [LEVEL] target: message
 */

use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};
use spin::Once;

use crate::sink::{CharSink, SinkWriter};
use crate::HalError;

pub struct Logger {
	sink: Once<&'static dyn CharSink>,
}

impl Logger {
	pub const fn new() -> Self {
		Logger { sink: Once::new() }
	}

	/* First attachment wins */
	pub fn attach(&self, sink: &'static dyn CharSink) {
		self.sink.call_once(|| sink);
	}
}

impl Default for Logger {
	fn default() -> Self {
		Self::new()
	}
}

impl Log for Logger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record) {
		if !self.enabled(record.metadata()) {
			return;
		}
		if let Some(sink) = self.sink.get() {
			let _ = writeln!(
				SinkWriter(*sink),
				"[{:<5}] {}: {}",
				record.level(),
				record.target(),
				record.args()
			);
		}
	}

	fn flush(&self) {}
}

static LOGGER: Logger = Logger::new();

/*
 * init - Route the `log` facade to a sink
 * @sink: Where records are written
 * @level: Most verbose level let through
 */
pub fn init(sink: &'static dyn CharSink, level: LevelFilter) -> Result<(), HalError> {
	log::set_logger(&LOGGER).map_err(|_| HalError::LoggerAlreadySet)?;
	LOGGER.attach(sink);
	log::set_max_level(level);
	Ok(())
}
