//! Task control block and the fixed-capacity arena that holds them.
//!
//! The original circular linked list of heap-allocated TCBs is replaced by
//! an arena: a fixed-size array walked by a modular cursor, so the ring
//! never needs an allocator or per-node `next` pointers. `TaskHandle` is
//! the public, `Copy` handle application code holds; it wraps the same
//! arena index internally.

use super::queue::MessageQueue;
use crate::hal::StackPtr;
use crate::hal::TaskEntry;

/// Upper bound on the number of tasks a single kernel instance can host.
pub const MAX_TASKS: usize = 16;

/// Why a task was last woken: distinguishes a timer expiry from an
/// explicit [`crate::wake`] without forcing callers to inspect both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WakeReason {
    Timer,
    Explicit(u16),
}

/// A stable, `Copy` handle to a task. Holding one does not keep the task
/// alive (tasks in this kernel never exit); it is simply an arena index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskHandle(pub(crate) usize);

pub(crate) struct Tcb {
    pub display_id: u8,
    pub entry: TaskEntry,
    pub saved_sp: StackPtr,
    pub queue: MessageQueue,
    pub timer_countdown: u16,
    pub timer_flag: bool,
    pub sleeping: bool,
    pub wake_reason: Option<WakeReason>,
    pub pending_dispatch: super::message::Message,
    pub pending_delay: u16,
    /// Set once the task has received its first (INIT) dispatch. Before
    /// that, it is unconditionally runnable regardless of queue/timer
    /// state: every task's very first event is INIT, delivered through
    /// this flag rather than through the message queue.
    pub started: bool,
}

impl Tcb {
    pub(crate) const fn placeholder() -> Self {
        Tcb {
            display_id: 0,
            entry: |_, _, _| crate::kernel::message::WAIT_FOREVER,
            saved_sp: StackPtr(core::ptr::null_mut()),
            queue: MessageQueue::new(0),
            timer_countdown: 0,
            timer_flag: false,
            sleeping: false,
            wake_reason: None,
            pending_dispatch: super::message::Message::new(0, 0, 0),
            pending_delay: 0,
            started: false,
        }
    }
}
