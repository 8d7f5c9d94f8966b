/*
 * Boot sequence
 *
 * Brings up the HAL output path, then hands its console to every
 * subsystem that prints diagnostics.
 */

use hal::{CharSink, DiagnosticClient, kprintln};
use log::{debug, info};
use util::heap::DiagnosticHeap;

use crate::HEAP_SPACE;
use crate::config::{HEAP_SIZE, KERNEL_LABEL, LOG_LEVEL};

/*
 * bring_up - Give each client the kernel label and the console
 * @console: Output every client will print through
 * @clients: Attached in slice order
 *
 * Whatever a client does with the console afterwards is its own business.
 */
pub fn bring_up(console: &'static dyn CharSink, clients: &[&dyn DiagnosticClient]) {
	for client in clients {
		client.attach_diagnostics(KERNEL_LABEL, console);
	}
	debug!("{} diagnostic clients attached", clients.len());
}

/*
 * kernel_main - Boot path proper
 * @heap: The global allocator, backed here by HEAP_SPACE
 */
pub fn kernel_main(heap: &'static DiagnosticHeap) -> ! {
	hal::init();
	let console = hal::console();
	let _ = hal::logger::init(console, LOG_LEVEL);

	bring_up(console, &[&util::panic::REPORTER, heap]);

	unsafe { heap.init(HEAP_SPACE.start(), HEAP_SIZE) };
	info!("heap ready: {} KiB", heap.free_bytes() / 1024);

	kprintln!("{} up", KERNEL_LABEL);
	hal::cpu::idle()
}
