/*
 * Output sinks
 *
 * The contract every output device implements, and the one subsystems
 * implement to be handed the HAL console.
 */

use core::fmt;

use crate::HalError;

//Returned by the C-ABI callback when a byte could not be written
pub const EOF: i32 = -1;

/*
 * trait CharSink - A destination for diagnostic bytes
 *
 * put returns the byte it wrote. Sinks are shared by reference across the
 * boot path, so any state they carry sits behind interior mutability.
 */
pub trait CharSink: Sync {
	fn put(&self, byte: u8) -> Result<u8, HalError>;

	//Byte by byte, in order, stopping at the first failure
	fn print(&self, text: &[u8]) -> Result<(), HalError> {
		for &byte in text {
			self.put(byte)?;
		}
		Ok(())
	}
}

/*
 * trait DiagnosticClient - Subsystem that wants somewhere to print
 *
 * The boot path calls this once per subsystem with the kernel label and
 * the HAL console. The subsystem owns all formatting from then on.
 */
pub trait DiagnosticClient {
	fn attach_diagnostics(&self, label: &'static str, sink: &'static dyn CharSink);
}

//fmt::Write over any sink
pub struct SinkWriter<'a>(pub &'a dyn CharSink);

impl fmt::Write for SinkWriter<'_> {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.0.print(s.as_bytes()).map_err(|_| fmt::Error)
	}
}

#[cfg(test)]
pub(crate) mod mock {
	use super::CharSink;
	use crate::HalError;
	use spin::Mutex;

	//Which sink saw which byte, in global order
	pub type Journal = Mutex<Vec<(&'static str, u8)>>;

	pub struct RecordingSink<'j> {
		name: &'static str,
		journal: &'j Journal,
		pub bytes: Mutex<Vec<u8>>,
	}

	impl<'j> RecordingSink<'j> {
		pub fn new(name: &'static str, journal: &'j Journal) -> Self {
			RecordingSink { name, journal, bytes: Mutex::new(Vec::new()) }
		}
	}

	impl CharSink for RecordingSink<'_> {
		fn put(&self, byte: u8) -> Result<u8, HalError> {
			self.bytes.lock().push(byte);
			self.journal.lock().push((self.name, byte));
			Ok(byte)
		}
	}

	//Rejects every byte
	pub struct BrokenSink;

	impl CharSink for BrokenSink {
		fn put(&self, _byte: u8) -> Result<u8, HalError> {
			Err(HalError::TransmitTimeout { port: 0, polls: 0 })
		}
	}
}

#[cfg(test)]
mod tests {
	use super::mock::*;
	use super::*;
	use core::fmt::Write;

	#[test]
	fn print_default_goes_through_put_in_order() {
		let journal = Journal::new(Vec::new());
		let sink = RecordingSink::new("a", &journal);
		sink.print(b"abc").unwrap();
		assert_eq!(*sink.bytes.lock(), b"abc");
	}

	#[test]
	fn print_stops_at_first_failure() {
		assert!(BrokenSink.print(b"xyz").is_err());
		assert_eq!(BrokenSink.print(b""), Ok(()));
	}

	#[test]
	fn writer_formats_into_sink() {
		let journal = Journal::new(Vec::new());
		let sink = RecordingSink::new("a", &journal);
		write!(SinkWriter(&sink), "{}-{:02}", "up", 7).unwrap();
		assert_eq!(*sink.bytes.lock(), b"up-07");
	}

	#[test]
	fn writer_reports_sink_failure() {
		assert!(write!(SinkWriter(&BrokenSink), "x").is_err());
	}
}
