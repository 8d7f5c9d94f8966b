/*
 * Kernel library
 *
 * The boot sequence and the memory the boot heap is carved from. The
 * entry point, panic handler and allocator live in main.rs.
 */

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod config;

use core::cell::UnsafeCell;

#[repr(align(16))]
pub struct HeapSpace(UnsafeCell<[u8; config::HEAP_SIZE]>);

//Only ever handed to the heap, once
unsafe impl Sync for HeapSpace {}

impl HeapSpace {
	pub fn start(&self) -> *mut u8 {
		self.0.get().cast()
	}
}

pub static HEAP_SPACE: HeapSpace = HeapSpace(UnsafeCell::new([0; config::HEAP_SIZE]));
