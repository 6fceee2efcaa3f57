// # Alert Store Implementations
//
// This module provides implementations of the AlertStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileAlertStore;
pub use memory::MemoryAlertStore;
