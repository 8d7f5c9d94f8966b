/*
 * VGA text display
 *
 * An 80x25 grid of cells in memory, each a character byte with a colour
 * attribute above it. Writes go straight to the buffer with volatile
 * stores; the screen scrolls up once the cursor passes the last row.
 */

use core::ptr::{read_volatile, write_volatile};

use spin::{Mutex, MutexGuard};

use crate::sink::CharSink;
use crate::HalError;

//VGA text-mode buffer, one u16 per cell: attribute in the high byte
pub const VGA_BUFFER: usize = 0xB8000;
pub const VGA_WIDTH: usize = 80;
pub const VGA_HEIGHT: usize = 25;

//Light grey on black
pub const DEFAULT_ATTRIBUTE: u8 = 0x07;

pub struct TextScreen {
	buffer: *mut u16,
	width: usize,
	height: usize,
	row: usize,
	col: usize,
	attribute: u8,
}

unsafe impl Send for TextScreen {}

impl TextScreen {
	/*
	 * new - Text screen over a cell buffer
	 * @buffer: First cell
	 * @width: Columns
	 * @height: Rows
	 *
	 * Safety: @buffer must point to width * height writable cells for as
	 * long as the screen is used.
	 */
	pub const unsafe fn new(buffer: *mut u16, width: usize, height: usize) -> Self {
		Self {
			buffer,
			width,
			height,
			row: 0,
			col: 0,
			attribute: DEFAULT_ATTRIBUTE,
		}
	}

	pub fn cursor(&self) -> (usize, usize) {
		(self.row, self.col)
	}

	pub fn set_attribute(&mut self, attribute: u8) {
		self.attribute = attribute;
	}

	pub fn put(&mut self, byte: u8) -> u8 {
		match byte {
			b'\n' => self.new_line(),
			b'\r' => self.col = 0,
			_ => {
				self.write_cell(self.row, self.col, byte);
				self.col += 1;
				if self.col >= self.width {
					self.new_line();
				}
			}
		}
		byte
	}

	pub fn print(&mut self, text: &[u8]) {
		for &byte in text {
			self.put(byte);
		}
	}

	pub fn clear(&mut self) {
		for row in 0..self.height {
			self.clear_row(row);
		}
		self.row = 0;
		self.col = 0;
	}

	fn new_line(&mut self) {
		self.col = 0;
		if self.row + 1 < self.height {
			self.row += 1;
		} else {
			self.scroll_up();
		}
	}

	fn scroll_up(&mut self) {
		for row in 1..self.height {
			for col in 0..self.width {
				let cell = self.read_raw(row, col);
				self.write_raw(row - 1, col, cell);
			}
		}
		self.clear_row(self.height - 1);
	}

	fn clear_row(&mut self, row: usize) {
		for col in 0..self.width {
			self.write_cell(row, col, b' ');
		}
	}

	fn write_cell(&mut self, row: usize, col: usize, byte: u8) {
		let cell = (self.attribute as u16) << 8 | byte as u16;
		self.write_raw(row, col, cell);
	}

	fn write_raw(&mut self, row: usize, col: usize, cell: u16) {
		unsafe { write_volatile(self.buffer.add(row * self.width + col), cell) }
	}

	fn read_raw(&self, row: usize, col: usize) -> u16 {
		unsafe { read_volatile(self.buffer.add(row * self.width + col)) }
	}
}

pub struct DisplaySink {
	screen: Mutex<TextScreen>,
}

impl DisplaySink {
	//The buffer every PC-compatible VGA adapter decodes at boot
	pub const fn vga() -> Self {
		//Identity-mapped legacy VGA memory, 80x25 cells
		Self::new(unsafe { TextScreen::new(VGA_BUFFER as *mut u16, VGA_WIDTH, VGA_HEIGHT) })
	}

	pub const fn new(screen: TextScreen) -> Self {
		Self {
			screen: Mutex::new(screen),
		}
	}

	pub fn lock(&self) -> MutexGuard<'_, TextScreen> {
		self.screen.lock()
	}
}

impl CharSink for DisplaySink {
	fn put(&self, byte: u8) -> Result<u8, HalError> {
		Ok(self.screen.lock().put(byte))
	}

	fn print(&self, text: &[u8]) -> Result<(), HalError> {
		self.screen.lock().print(text);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const W: usize = 4;
	const H: usize = 3;

	fn screen(cells: &mut Vec<u16>) -> TextScreen {
		unsafe { TextScreen::new(cells.as_mut_ptr(), W, H) }
	}

	fn text_of(cells: &[u16], row: usize) -> Vec<u8> {
		cells[row * W..(row + 1) * W].iter().map(|c| *c as u8).collect()
	}

	#[test]
	fn put_writes_cell_with_attribute() {
		let mut cells = vec![0u16; W * H];
		let mut s = screen(&mut cells);
		assert_eq!(s.put(b'A'), b'A');
		assert_eq!(s.cursor(), (0, 1));
		drop(s);
		assert_eq!(cells[0], 0x0741);
	}

	#[test]
	fn wraps_at_end_of_row() {
		let mut cells = vec![0u16; W * H];
		let mut s = screen(&mut cells);
		s.print(b"abcde");
		assert_eq!(s.cursor(), (1, 1));
		drop(s);
		assert_eq!(text_of(&cells, 0), b"abcd");
		assert_eq!(cells[W] as u8, b'e');
	}

	#[test]
	fn newline_and_carriage_return() {
		let mut cells = vec![0u16; W * H];
		let mut s = screen(&mut cells);
		s.print(b"ab\r\ncd");
		assert_eq!(s.cursor(), (1, 2));
		s.put(b'\r');
		assert_eq!(s.cursor(), (1, 0));
	}

	#[test]
	fn scrolls_when_past_last_row() {
		let mut cells = vec![0u16; W * H];
		let mut s = screen(&mut cells);
		s.print(b"1\n2\n3\n4");
		assert_eq!(s.cursor(), (2, 1));
		drop(s);
		assert_eq!(text_of(&cells, 0)[0], b'2');
		assert_eq!(text_of(&cells, 1)[0], b'3');
		assert_eq!(text_of(&cells, 2), b"4   ");
	}

	#[test]
	fn sink_echoes_and_ignores_empty_text() {
		let mut cells = vec![0u16; W * H];
		let sink = DisplaySink::new(screen(&mut cells));
		assert_eq!(sink.put(b'z'), Ok(b'z'));
		sink.print(b"").unwrap();
		assert_eq!(sink.lock().cursor(), (0, 1));
	}
}
