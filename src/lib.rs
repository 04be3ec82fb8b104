//! KDOS: a cooperative, round-robin microkernel core for single-core
//! microcontrollers.
//!
//! The kernel core ([`kernel`]) never touches hardware directly; every
//! hardware-facing operation goes through the [`hal::Hal`] trait. This crate
//! ships one concrete backend, [`hal::x86_64`], used by the demo binary and
//! left swappable for other targets.
#![cfg_attr(not(test), no_std)]
#![feature(abi_x86_interrupt)]

#[cfg(test)]
extern crate std;

pub mod hal;
pub mod kernel;

pub use hal::TaskEntry;
pub use kernel::error::KernelError;
pub use kernel::message::{Message, INIT, TIMER};
pub use kernel::scheduler::{init_task, run_os, TaskHandle};
pub use kernel::send_msg;
pub use kernel::sleep::{sleep, wake, INHIBIT, PERMIT};
pub use kernel::WAIT_FOREVER;
