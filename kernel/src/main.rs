#![no_std]
#![no_main]

use core::panic::PanicInfo;

use kernel::boot;
use util::heap::DiagnosticHeap;
use util::panic::REPORTER;

#[global_allocator]
static KERNEL_HEAP: DiagnosticHeap = DiagnosticHeap::empty();

#[unsafe(no_mangle)]
pub extern "C" fn _start() -> ! {
	boot::kernel_main(&KERNEL_HEAP)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
	REPORTER.report(info);
	hal::cpu::freeze()
}
