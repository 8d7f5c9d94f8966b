/*
 * Panic reporting
 *
 * The reporter learns where to print from the boot path, then renders
 * panics as one line prefixed by the kernel label.
 */

use core::fmt::{Display, Write};
use core::panic::{Location, PanicInfo};

use hal::{CharSink, DiagnosticClient, SinkWriter};
use spin::Once;

struct Attachment {
	label: &'static str,
	sink: &'static dyn CharSink,
}

pub struct PanicReporter {
	attachment: Once<Attachment>,
}

impl PanicReporter {
	pub const fn new() -> Self {
		PanicReporter { attachment: Once::new() }
	}

	pub fn label(&self) -> Option<&'static str> {
		self.attachment.get().map(|a| a.label)
	}

	/*
	 * report - Print a panic
	 *
	 * Silent until attached; the panic path must not need anything
	 * that might not exist yet.
	 */
	pub fn report(&self, info: &PanicInfo) {
		self.report_message(info.message(), info.location());
	}

	pub fn report_message(&self, message: impl Display, location: Option<&Location<'_>>) {
		let Some(at) = self.attachment.get() else {
			return;
		};
		let mut out = SinkWriter(at.sink);
		let _ = write!(out, "\n[{}] PANIC: {}", at.label, message);
		if let Some(loc) = location {
			let _ = write!(out, " ({}:{})", loc.file(), loc.line());
		}
		let _ = out.write_char('\n');
	}

	/*
	 * oops - Report a fatal condition outside the panic machinery
	 */
	pub fn oops(&self, msg: &str) -> ! {
		if let Some(at) = self.attachment.get() {
			let _ = writeln!(SinkWriter(at.sink), "[{}] OOPS: {}", at.label, msg);
		}
		halt_loop();
	}
}

impl Default for PanicReporter {
	fn default() -> Self {
		Self::new()
	}
}

impl DiagnosticClient for PanicReporter {
	//First attachment wins
	fn attach_diagnostics(&self, label: &'static str, sink: &'static dyn CharSink) {
		self.attachment.call_once(|| Attachment { label, sink });
	}
}

pub static REPORTER: PanicReporter = PanicReporter::new();

pub fn oops(msg: &str) -> ! {
	REPORTER.oops(msg)
}

pub fn halt_loop() -> ! {
	hal::cpu::freeze()
}

#[cfg(test)]
mod tests {
	use super::*;
	use hal::HalError;
	use spin::Mutex;

	struct Capture(Mutex<Vec<u8>>);

	impl CharSink for Capture {
		fn put(&self, byte: u8) -> Result<u8, HalError> {
			self.0.lock().push(byte);
			Ok(byte)
		}
	}

	#[test]
	fn attach_keeps_the_first_label() {
		static FIRST: Capture = Capture(Mutex::new(Vec::new()));
		static SECOND: Capture = Capture(Mutex::new(Vec::new()));
		let reporter = PanicReporter::new();
		assert_eq!(reporter.label(), None);
		reporter.attach_diagnostics("first", &FIRST);
		reporter.attach_diagnostics("second", &SECOND);
		assert_eq!(reporter.label(), Some("first"));
	}

	#[test]
	fn report_renders_label_message_and_location() {
		static OUT: Capture = Capture(Mutex::new(Vec::new()));
		let reporter = PanicReporter::new();
		reporter.attach_diagnostics("tinker", &OUT);

		reporter.report_message(format_args!("frame {} lost", 7), Some(Location::caller()));

		let text = String::from_utf8(OUT.0.lock().clone()).unwrap();
		assert!(text.starts_with("\n[tinker] PANIC: frame 7 lost ("));
		assert!(text.contains("panic.rs:"));
		assert!(text.ends_with(")\n"));
	}

	#[test]
	fn unattached_reporter_is_silent() {
		PanicReporter::new().report_message("nobody listening", None);
	}
}
