/*
 * Kernel Heap
 *
 * Linked-list heap that reports exhaustion through the diagnostic sink
 * it was handed at boot before failing the allocation.
 */

use core::alloc::{GlobalAlloc, Layout};
use core::fmt::Write;

use hal::{CharSink, DiagnosticClient, SinkWriter};
use linked_list_allocator::LockedHeap;
use spin::Once;

struct Diagnostics {
	label: &'static str,
	sink: &'static dyn CharSink,
}

pub struct DiagnosticHeap {
	heap: LockedHeap,
	diagnostics: Once<Diagnostics>,
}

impl DiagnosticHeap {
	pub const fn empty() -> Self {
		DiagnosticHeap {
			heap: LockedHeap::empty(),
			diagnostics: Once::new(),
		}
	}

	/*
	 * init - Hand the heap its backing memory
	 * @start: First byte of the region
	 * @size: Region length in bytes
	 *
	 * # Safety
	 * The region must be valid, unused by anything else, and called once.
	 */
	pub unsafe fn init(&self, start: *mut u8, size: usize) {
		unsafe { self.heap.lock().init(start, size) };
	}

	pub fn free_bytes(&self) -> usize {
		self.heap.lock().free()
	}

	fn report_exhaustion(&self, layout: Layout) {
		if let Some(diag) = self.diagnostics.get() {
			let _ = writeln!(
				SinkWriter(diag.sink),
				"[{}] heap: out of memory ({} bytes)",
				diag.label,
				layout.size()
			);
		}
	}
}

unsafe impl GlobalAlloc for DiagnosticHeap {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		let ptr = unsafe { self.heap.alloc(layout) };
		if ptr.is_null() {
			self.report_exhaustion(layout);
		}
		ptr
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		unsafe { self.heap.dealloc(ptr, layout) }
	}
}

impl DiagnosticClient for DiagnosticHeap {
	fn attach_diagnostics(&self, label: &'static str, sink: &'static dyn CharSink) {
		self.diagnostics.call_once(|| Diagnostics { label, sink });
	}
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

	fn heap_with(region: &mut [u64]) -> DiagnosticHeap {
		let heap = DiagnosticHeap::empty();
		unsafe { heap.init(region.as_mut_ptr().cast(), region.len() * 8) };
		heap
	}

	#[test]
	fn allocates_from_region() {
		let mut region = vec![0u64; 512];
		let heap = heap_with(&mut region);
		let before = heap.free_bytes();
		let layout = Layout::from_size_align(64, 8).unwrap();
		let ptr = unsafe { heap.alloc(layout) };
		assert!(!ptr.is_null());
		assert!(heap.free_bytes() < before);
		unsafe { heap.dealloc(ptr, layout) };
		assert_eq!(heap.free_bytes(), before);
	}

	#[test]
	fn exhaustion_is_reported_on_the_sink() {
		static OUT: Capture = Capture(Mutex::new(Vec::new()));
		let mut region = vec![0u64; 16];
		let heap = heap_with(&mut region);
		heap.attach_diagnostics("tinker", &OUT);

		let huge = Layout::from_size_align(4096, 8).unwrap();
		assert!(unsafe { heap.alloc(huge) }.is_null());
		assert_eq!(
			String::from_utf8(OUT.0.lock().clone()).unwrap(),
			"[tinker] heap: out of memory (4096 bytes)\n"
		);
	}

	#[test]
	fn exhaustion_without_diagnostics_just_fails() {
		let mut region = vec![0u64; 16];
		let heap = heap_with(&mut region);
		let huge = Layout::from_size_align(4096, 8).unwrap();
		assert!(unsafe { heap.alloc(huge) }.is_null());
	}
}
