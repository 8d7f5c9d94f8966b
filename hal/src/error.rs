/*
 * HAL error kinds
 *
 * The output path is best-effort; these surface only where a caller opted
 * into a bound (poll limit, sink table capacity) or misconfigured a port.
 */

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HalError {
	#[error("transmitter at {port:#x} not ready after {polls} polls")]
	TransmitTimeout { port: u16, polls: u32 },

	#[error("sink table full ({capacity} sinks)")]
	SinkTableFull { capacity: usize },

	#[error("baud rate {0} is not reachable from the 115200 Hz UART clock")]
	InvalidBaudRate(u32),

	#[error("a logger has already been installed")]
	LoggerAlreadySet,
}
