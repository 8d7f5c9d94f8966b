/*
 * Dispatcher
 *
 * Fans the HAL output contract out over an ordered set of sinks.
 */

use spin::Mutex;

use crate::sink::CharSink;
use crate::HalError;

/*
 * struct Dispatcher - Up to N sinks, invoked in registration order
 *
 * Every byte reaches every sink regardless of what earlier sinks return.
 * print gives each sink the whole text before moving to the next one.
 */
pub struct Dispatcher<'a, const N: usize> {
	sinks: Mutex<[Option<&'a dyn CharSink>; N]>,
}

impl<'a, const N: usize> Dispatcher<'a, N> {
	pub const fn new() -> Self {
		Dispatcher { sinks: Mutex::new([None; N]) }
	}

	//Appends sink, returning its position in dispatch order
	pub fn register(&self, sink: &'a dyn CharSink) -> Result<usize, HalError> {
		let mut sinks = self.sinks.lock();
		let slot = sinks
			.iter()
			.position(Option::is_none)
			.ok_or(HalError::SinkTableFull { capacity: N })?;
		sinks[slot] = Some(sink);
		Ok(slot)
	}

	pub fn len(&self) -> usize {
		self.sinks.lock().iter().flatten().count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	//Copied out: a sink may re-enter the dispatcher or register another sink
	fn snapshot(&self) -> [Option<&'a dyn CharSink>; N] {
		*self.sinks.lock()
	}
}

impl<const N: usize> Default for Dispatcher<'_, N> {
	fn default() -> Self {
		Self::new()
	}
}

impl<const N: usize> CharSink for Dispatcher<'_, N> {
	fn put(&self, byte: u8) -> Result<u8, HalError> {
		for sink in self.snapshot().into_iter().flatten() {
			let _ = sink.put(byte);
		}
		Ok(byte)
	}

	fn print(&self, text: &[u8]) -> Result<(), HalError> {
		for sink in self.snapshot().into_iter().flatten() {
			let _ = sink.print(text);
		}
		Ok(())
	}
}
