/*
 * CPU Control Functions
 *
 * Halt and interrupt-flag control used by the boot path.
 */

use x86_64::instructions::{hlt, interrupts};

#[inline(always)]
pub fn halt() {
	hlt();
}

#[inline(always)]
pub fn enable_interrupts() {
	interrupts::enable();
}

#[inline(always)]
pub fn disable_interrupts() {
	interrupts::disable();
}

/*
 * idle - Halt forever, waking only to halt again
 *
 * Interrupts are left as they are; nothing is installed to service them
 * this early, so HLT simply parks the CPU.
 */
pub fn idle() -> ! {
	loop {
		halt();
	}
}

/*
 * freeze - Mask interrupts and halt forever
 *
 * Used once the system has given up (panic, heap exhaustion).
 */
pub fn freeze() -> ! {
	disable_interrupts();
	idle()
}
