//! The hardware-agnostic kernel core: task arena, dispatch loop, message
//! queues, and the sleep/wake pair. Every operation here is generic over
//! [`crate::hal::Hal`] and touches no register or memory-mapped device
//! directly.

pub mod error;
pub mod message;
pub mod queue;
pub mod scheduler;
pub mod sleep;
pub mod tcb;

pub use message::WAIT_FOREVER;
pub use scheduler::send_msg;
