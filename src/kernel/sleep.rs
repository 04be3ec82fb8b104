//! The `sleep`/`wake` pair: the only primitives that suspend a task mid-call
//! rather than between dispatches.

use crate::hal::{Hal, StackPtr};
use crate::kernel::message::WAIT_FOREVER;
use crate::kernel::scheduler::{with_kernel, TaskHandle, KERNEL};
use crate::kernel::tcb::WakeReason;

/// Value for `sleep`'s `permit_switch`: other tasks may still be dispatched
/// while this one sleeps (the ordinary case).
pub const PERMIT: bool = true;

/// Value for `sleep`'s `permit_switch`: switch-inhibit. The scheduler keeps
/// re-examining only the calling task until it wakes; other tasks' timers
/// still decrement, but none of them are dispatched in the meantime.
pub const INHIBIT: bool = false;

/// Suspend the calling task.
///
/// * `delay == 0`: the task is immediately runnable again on its next ring
///   visit, without waiting on a tick -- a yield that goes through the
///   sleep/wake path instead of a plain dispatch return.
/// * `delay == WAIT_FOREVER`: block until [`crate::wake`] is called; the
///   timer never fires on its own.
/// * anything else: block for up to `delay` ticks, or until woken
///   explicitly, whichever comes first.
///
/// `permit_switch` becomes the kernel's `multitask` flag for the duration
/// of the sleep ([`INHIBIT`] pins the ring on this task alone); it is
/// restored to `true` before this call returns.
///
/// Must be called from task context (i.e. from within a running `entry`
/// call); panics otherwise.
pub fn sleep<H: Hal>(delay: u16, permit_switch: bool) -> u16 {
    let idx =
        with_kernel::<H, _>(|k| k.current.expect("sleep() called outside task context"));

    with_kernel::<H, _>(|k| {
        let t = &mut k.tasks[idx];
        t.sleeping = true;
        // Default wake reason: a timeout. `wake()` overwrites this with an
        // explicit reason if it reaches the critical section before the
        // timer does; whichever sets `timer_flag` first wins the race.
        t.wake_reason = Some(WakeReason::Timer);
        match delay {
            0 => {
                t.timer_countdown = 0;
                // Already due: the next ring visit wakes it, same as a
                // plain yield would, without waiting on a tick.
                t.timer_flag = true;
            }
            WAIT_FOREVER => {
                t.timer_countdown = 0;
                t.timer_flag = false;
            }
            ms => {
                t.timer_countdown = ms;
                t.timer_flag = false;
            }
        }
        k.multitask = permit_switch;
    });

    switch_to_scheduler::<H>(idx);

    with_kernel::<H, _>(|k| {
        k.multitask = true;
        match k.tasks[idx].wake_reason.take() {
            Some(WakeReason::Timer) => 0,
            Some(WakeReason::Explicit(reason)) => reason,
            None => 0,
        }
    })
}

fn switch_to_scheduler<H: Hal>(idx: usize) {
    let (save_to, target) = {
        let mut k = KERNEL.lock();
        let save_to: *mut StackPtr = &mut k.tasks[idx].saved_sp as *mut StackPtr;
        let target = k.scheduler_sp;
        (save_to, target)
    };
    unsafe { H::context_switch(save_to, target) };
}

/// Wake a sleeping task with an explicit, non-zero reason. `reason == 0`
/// is reserved for timer-originated wakes and is rejected here: a task
/// that receives `0` from `sleep` can never tell a timeout from a
/// malformed explicit wake unless callers are barred from sending one.
///
/// A no-op if the task isn't currently sleeping, or if its `timer_flag` is
/// already set (first wake wins; see the tick ISR for the other half of
/// that race -- whichever of `tick`/`wake` sets `timer_flag` first is the
/// one `plan_dispatch` honors).
pub fn wake<H: Hal>(task: TaskHandle, reason: u16) {
    if reason == 0 {
        return;
    }
    with_kernel::<H, _>(|k| {
        let t = &mut k.tasks[task.0];
        if t.sleeping && !t.timer_flag {
            t.wake_reason = Some(WakeReason::Explicit(reason));
            t.timer_flag = true;
        }
    });
}
