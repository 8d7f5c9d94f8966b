/*
 * Hardware Abstraction Layer (HAL)
 *
 * Early-boot diagnostic output:
 * - Port I/O and CPU control
 * - VGA text display and 16550 serial sinks
 * - A dispatcher fanning every byte out to all registered sinks
 * - C-ABI output callbacks for subsystems that take a function pointer
 */

#![cfg_attr(not(test), no_std)]

pub mod cpu;
pub mod display;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod logger;
pub mod serial;
pub mod sink;

use core::ffi::{CStr, c_char, c_int};
use core::fmt::Write;

use spin::Once;

pub use dispatch::Dispatcher;
pub use display::DisplaySink;
pub use error::HalError;
pub use io::*;
pub use serial::{SerialConfig, SerialSink};
pub use sink::{CharSink, DiagnosticClient, EOF, SinkWriter};

//Room for display, serial and a couple of late additions
pub const MAX_SINKS: usize = 4;

static DISPLAY: DisplaySink = DisplaySink::vga();
static SERIAL: SerialSink = SerialSink::new(Pio, SerialConfig::COM1);
static HAL: Dispatcher<'static, MAX_SINKS> = Dispatcher::new();
static REGISTERED: Once = Once::new();

/*
 * init - Bring up the HAL output path
 *
 * Registers the display then the serial sink. Touches no hardware: each
 * sink programs its device on first use. Safe to call more than once.
 */
pub fn init() {
	REGISTERED.call_once(|| {
		let _ = HAL.register(&DISPLAY);
		let _ = HAL.register(&SERIAL);
	});
}

/*
 * register_sink - Add an output sink after display and serial
 */
pub fn register_sink(sink: &'static dyn CharSink) -> Result<usize, HalError> {
	init();
	HAL.register(sink)
}

/*
 * console - The dispatcher as a sink, for handing to other subsystems
 */
pub fn console() -> &'static dyn CharSink {
	&HAL
}

/*
 * putchar_via - int(int) contract over any sink
 * @c: Character; only the low byte is written
 *
 * Returns @c, or EOF if the byte could not be written.
 */
pub fn putchar_via(sink: &dyn CharSink, c: c_int) -> c_int {
	match sink.put(c as u8) {
		Ok(_) => c,
		Err(_) => EOF,
	}
}

/*
 * print_via - void(const char*) contract over any sink
 * @string: NUL-terminated string, or null (ignored)
 *
 * Safety: a non-null @string must point to a NUL-terminated string.
 */
pub unsafe fn print_via(sink: &dyn CharSink, string: *const c_char) {
	if string.is_null() {
		return;
	}
	let text = unsafe { CStr::from_ptr(string) };
	let _ = sink.print(text.to_bytes());
}

//Formatted output, best effort
pub fn write_fmt_via(sink: &dyn CharSink, args: core::fmt::Arguments) {
	let _ = SinkWriter(sink).write_fmt(args);
}

/*
 * hal_putchar - int(int) output callback
 */
#[unsafe(no_mangle)]
pub extern "C" fn hal_putchar(c: c_int) -> c_int {
	putchar_via(&HAL, c)
}

/*
 * hal_print - void(const char*) output callback
 *
 * Safety: see print_via.
 */
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hal_print(string: *const c_char) {
	unsafe { print_via(&HAL, string) }
}

//HAL print macro
#[macro_export]
macro_rules! kprint {
	($($arg:tt)*) => {
		$crate::_print(format_args!($($arg)*))
	};
}

//HAL println macro
#[macro_export]
macro_rules! kprintln {
	() => ($crate::kprint!("\n"));
	($($arg:tt)*) => {
		$crate::kprint!("{}\n", format_args!($($arg)*))
	};
}

#[doc(hidden)]
pub fn _print(args: core::fmt::Arguments) {
	write_fmt_via(&HAL, args);
}
