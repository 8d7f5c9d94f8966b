/*
 * Utility Library
 *
 * Subsystems that are handed the HAL console during boot: the panic
 * reporter and the kernel heap.
 */

#![cfg_attr(not(test), no_std)]

pub mod heap;
pub mod panic;
