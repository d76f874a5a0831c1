pub mod command;
pub mod memory;
