/*
 * 16550 UART, write-only
 *
 * Drives one serial channel in polled mode for outbound diagnostics. The
 * channel is programmed lazily on the first transmitted byte (or by an
 * explicit init), exactly once. Every byte waits for the transmit holding
 * register to drain; with the default poll policy that wait has no bound,
 * so an absent UART hangs the caller.
 */

use spin::{Mutex, MutexGuard};

use crate::io::{Pio, PortIo};
use crate::sink::CharSink;
use crate::HalError;

//COM1 serial port base address
pub const COM1: u16 = 0x3F8;

//Divisor latch counts ticks of this clock
pub const UART_CLOCK_HZ: u32 = 115_200;

//Serial port register offsets
const DATA_REG: u16 = 0;        //Data register (divisor low with DLAB)
const INT_EN_REG: u16 = 1;      //Interrupt enable register (divisor high with DLAB)
const FIFO_REG: u16 = 2;        //FIFO control register
const LINE_CTRL_REG: u16 = 3;   //Line control register
const MODEM_CTRL_REG: u16 = 4;  //Modem control register
const LINE_STATUS_REG: u16 = 5; //Line status register

const LCR_DLAB: u8 = 0x80;
const LSR_THR_EMPTY: u8 = 0x20;

/*
 * struct PollPolicy - How the transmitter wait behaves
 * @limit: Give up after this many not-ready polls; None spins forever
 * @relax: Called between polls (spin hint, or a yield once one exists)
 *
 * Bounding the wait changes observable timing: a put may now fail instead
 * of blocking until the hardware drains.
 */
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
	pub limit: Option<u32>,
	pub relax: fn(),
}

impl PollPolicy {
	pub const UNBOUNDED: PollPolicy = PollPolicy { limit: None, relax: core::hint::spin_loop };

	pub const fn bounded(limit: u32) -> Self {
		PollPolicy { limit: Some(limit), relax: core::hint::spin_loop }
	}
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self::UNBOUNDED
	}
}

/*
 * struct SerialConfig - Channel parameters programmed at init
 *
 * COM1 is 38400 baud (divisor 3), 8N1, FIFO enabled and cleared with a
 * 14-byte threshold, RTS/DSR asserted with the IRQ line enabled.
 */
#[derive(Debug, Clone, Copy)]
pub struct SerialConfig {
	pub base: u16,
	pub divisor: u16,
	pub line_control: u8,
	pub fifo_control: u8,
	pub modem_control: u8,
	pub poll: PollPolicy,
}

impl SerialConfig {
	pub const COM1: SerialConfig = SerialConfig {
		base: COM1,
		divisor: 3,
		line_control: 0x03,
		fifo_control: 0xC7,
		modem_control: 0x0B,
		poll: PollPolicy::UNBOUNDED,
	};

	/*
	 * with_baud - Same channel, different line speed
	 * @baud: Bits per second; must divide the UART clock evenly
	 */
	pub fn with_baud(self, baud: u32) -> Result<Self, HalError> {
		if baud == 0 || UART_CLOCK_HZ % baud != 0 {
			return Err(HalError::InvalidBaudRate(baud));
		}
		let divisor = u16::try_from(UART_CLOCK_HZ / baud).map_err(|_| HalError::InvalidBaudRate(baud))?;
		Ok(SerialConfig { divisor, ..self })
	}

	pub const fn with_poll(self, poll: PollPolicy) -> Self {
		SerialConfig { poll, ..self }
	}

	pub const fn baud_rate(&self) -> u32 {
		match self.divisor {
			0 => 0,
			divisor => UART_CLOCK_HZ / divisor as u32,
		}
	}

	pub const fn status_port(&self) -> u16 {
		self.base + LINE_STATUS_REG
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
	Uninitialized,
	Initialized,
}

/*
 * struct Uart - One serial channel and its init state
 *
 * Owns the register interface, so separate channels (or separate tests)
 * never share state.
 */
pub struct Uart<P: PortIo> {
	ports: P,
	config: SerialConfig,
	state: ChannelState,
}

impl<P: PortIo> Uart<P> {
	pub const fn new(ports: P, config: SerialConfig) -> Self {
		Uart { ports, config, state: ChannelState::Uninitialized }
	}

	pub fn state(&self) -> ChannelState {
		self.state
	}

	pub fn config(&self) -> &SerialConfig {
		&self.config
	}

	pub fn ports(&self) -> &P {
		&self.ports
	}

	/*
	 * init - Program the channel
	 *
	 * No-op once the channel is initialized.
	 */
	pub fn init(&mut self) {
		if self.state == ChannelState::Initialized {
			return;
		}
		let base = self.config.base;
		let [divisor_lo, divisor_hi] = self.config.divisor.to_le_bytes();

		self.ports.write_port(base + INT_EN_REG, 0x00);       //Disable interrupts
		self.ports.write_port(base + LINE_CTRL_REG, LCR_DLAB); //Enable DLAB
		self.ports.write_port(base + DATA_REG, divisor_lo);
		self.ports.write_port(base + INT_EN_REG, divisor_hi);
		self.ports.write_port(base + LINE_CTRL_REG, self.config.line_control);
		self.ports.write_port(base + FIFO_REG, self.config.fifo_control);
		self.ports.write_port(base + MODEM_CTRL_REG, self.config.modem_control);

		self.state = ChannelState::Initialized;
	}

	//Check if transmit holding register is empty
	fn is_transmit_empty(&mut self) -> bool {
		self.ports.read_port(self.config.status_port()) & LSR_THR_EMPTY != 0
	}

	/*
	 * wait_transmit_empty - Spin until the transmitter can take a byte
	 *
	 * Returns the number of not-ready polls observed.
	 */
	fn wait_transmit_empty(&mut self) -> Result<u32, HalError> {
		let mut polls: u32 = 0;
		while !self.is_transmit_empty() {
			polls = polls.saturating_add(1);
			if let Some(limit) = self.config.poll.limit {
				if polls >= limit {
					return Err(HalError::TransmitTimeout { port: self.config.base, polls });
				}
			}
			(self.config.poll.relax)();
		}
		Ok(polls)
	}

	/*
	 * put - Transmit one byte
	 * @byte: Byte to send
	 *
	 * Initializes the channel on first use, then blocks until the
	 * transmitter is ready. Returns the byte written.
	 */
	pub fn put(&mut self, byte: u8) -> Result<u8, HalError> {
		self.init();
		self.wait_transmit_empty()?;
		let data = self.config.base + DATA_REG;
		self.ports.write_port(data, byte);
		Ok(byte)
	}

	//Write a byte string; empty input never touches the hardware
	pub fn print(&mut self, text: &[u8]) -> Result<(), HalError> {
		for &byte in text {
			self.put(byte)?;
		}
		Ok(())
	}
}

/*
 * struct SerialSink - Lockable UART usable as a shared output sink
 */
pub struct SerialSink<P: PortIo = Pio> {
	uart: Mutex<Uart<P>>,
}

impl<P: PortIo> SerialSink<P> {
	pub const fn new(ports: P, config: SerialConfig) -> Self {
		SerialSink { uart: Mutex::new(Uart::new(ports, config)) }
	}

	pub fn init(&self) {
		self.uart.lock().init();
	}

	pub fn lock(&self) -> MutexGuard<'_, Uart<P>> {
		self.uart.lock()
	}
}

impl<P: PortIo + Send> CharSink for SerialSink<P> {
	fn put(&self, byte: u8) -> Result<u8, HalError> {
		self.uart.lock().put(byte)
	}

	//Hold the lock across the whole string so concurrent prints stay whole
	fn print(&self, text: &[u8]) -> Result<(), HalError> {
		self.uart.lock().print(text)
	}
}
