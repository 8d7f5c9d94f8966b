use log::LevelFilter;

//Prefix every collaborator puts on its diagnostics
pub const KERNEL_LABEL: &str = "tinker-generated kernel";

pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

//Backing store for the boot heap (1 MiB)
pub const HEAP_SIZE: usize = 1024 * 1024;
