//! The scheduler: task arena, dispatch loop, and the task-exit trampoline.
//!
//! Generic over [`Hal`] the way the old `Scheduler`/`KernelSchedCtx` split
//! kept policy generic over mechanism; here the "mechanism" is the
//! concrete hardware backend instead of a scheduling algorithm, but the
//! shape is the same: this module never assumes which `Hal` it's talking
//! to, and a binary picks exactly one at its single `run_os::<H>()` call
//! site.

use spin::Mutex;

use crate::hal::{Hal, InterruptGuard, StackPtr, TaskEntry};
use crate::kernel::error::KernelError;
use crate::kernel::message::{Message, INIT, TIMER, WAIT_FOREVER};
use crate::kernel::queue::MessageQueue;
use crate::kernel::tcb::{Tcb, WakeReason, MAX_TASKS};

pub use crate::kernel::tcb::TaskHandle;

pub(crate) struct Kernel {
    pub(crate) tasks: [Tcb; MAX_TASKS],
    pub(crate) len: usize,
    pub(crate) cursor: usize,
    pub(crate) current: Option<usize>,
    pub(crate) multitask: bool,
    pub(crate) scheduler_sp: StackPtr,
}

impl Kernel {
    const fn new() -> Self {
        const PLACEHOLDER: Tcb = Tcb::placeholder();
        Kernel {
            tasks: [PLACEHOLDER; MAX_TASKS],
            len: 0,
            cursor: 0,
            current: None,
            multitask: true,
            scheduler_sp: StackPtr(core::ptr::null_mut()),
        }
    }
}

pub(crate) static KERNEL: Mutex<Kernel> = Mutex::new(Kernel::new());

/// Run `f` with the kernel singleton locked and interrupts masked for the
/// duration. This is the only atomicity primitive in the kernel: never
/// held across a [`Hal::context_switch`] call.
pub(crate) fn with_kernel<H: Hal, R>(f: impl FnOnce(&mut Kernel) -> R) -> R {
    let _guard = InterruptGuard::acquire::<H>();
    let mut k = KERNEL.lock();
    f(&mut k)
}

/// Create a task. Its entry function is dispatched with `(INIT, 0, 0)` the
/// first time the scheduler runs it; from then on it is dispatched with
/// each popped message, with `(TIMER, 0, 0)` when its timer expires and no
/// message is pending, or resumed inside its own `sleep` call when woken.
///
/// `stack` must outlive the kernel; on a target without an allocator this
/// is typically a `static mut` array the caller owns.
pub fn init_task<H: Hal>(
    entry: TaskEntry,
    stack: &'static mut [u8],
    queue_capacity: usize,
    display_id: u8,
) -> Result<TaskHandle, KernelError> {
    if queue_capacity == 0 {
        return Err(KernelError::QueueCapacityZero);
    }
    if queue_capacity > crate::kernel::queue::MAX_QUEUE_LEN {
        return Err(KernelError::QueueCapacityZero);
    }

    let sp = H::init_task_stack(stack, task_trampoline::<H>)
        .ok_or(KernelError::StackAllocFailed)?;

    with_kernel::<H, _>(|k| {
        if k.len >= MAX_TASKS {
            return Err(KernelError::TaskArenaFull);
        }
        let idx = k.len;
        k.tasks[idx] = Tcb {
            display_id,
            entry,
            saved_sp: sp,
            queue: MessageQueue::new(queue_capacity),
            timer_countdown: 0,
            timer_flag: false,
            sleeping: false,
            wake_reason: None,
            pending_dispatch: Message::new(INIT, 0, 0),
            pending_delay: WAIT_FOREVER,
            started: false,
        };
        k.len += 1;
        Ok(TaskHandle(idx))
    })
}

/// One scheduler-loop iteration: examine the current ring position,
/// dispatch it if runnable, then advance to the next position -- but only
/// if `multitask` is still set once the dispatch (if any) returns control
/// here. Returns `true` if a task was dispatched, `false` if it was not
/// runnable this visit and the caller should wait for an interrupt.
///
/// `multitask` is checked after the dispatch, not before, because a task
/// can flip it out from under this call: `sleep(_, INHIBIT)` sets
/// `multitask = false` from inside the very dispatch this call just made,
/// which is what keeps the ring pinned on that one task (switch-inhibit)
/// until it wakes and restores `multitask = true` on its way out.
fn switch_task<H: Hal>() -> bool {
    let (len, idx) = with_kernel::<H, _>(|k| (k.len, k.cursor));
    if len == 0 {
        return false;
    }

    let dispatch = with_kernel::<H, _>(|k| plan_dispatch(k, idx));
    let dispatched = dispatch.is_some();
    if let Some(plan) = dispatch {
        run_dispatch::<H>(idx, plan);
    }
    with_kernel::<H, _>(|k| {
        if k.multitask {
            k.cursor = (idx + 1) % k.len;
        }
    });
    dispatched
}

/// What the next context switch into task `idx` should deliver.
enum Dispatch {
    /// A fresh call to `entry(msg)`; the task's stack is at rest (either
    /// never started, or finished its previous call).
    Fresh(Message),
    /// Resume inside the task's own in-progress `sleep` call.
    Wake(WakeReason),
}

fn plan_dispatch(k: &mut Kernel, idx: usize) -> Option<Dispatch> {
    let t = &mut k.tasks[idx];
    if !t.started {
        // INIT is delivered exactly once, through the stack frame the HAL
        // primed at `init_task` time, never through the queue: a freshly
        // created task is unconditionally runnable on its first ring visit
        // regardless of queue or timer state.
        return Some(Dispatch::Fresh(Message::new(INIT, 0, 0)));
    }
    if t.sleeping {
        if t.timer_flag {
            t.timer_flag = false;
            let reason = t.wake_reason.take().unwrap_or(WakeReason::Timer);
            return Some(Dispatch::Wake(reason));
        }
        return None;
    }
    if let Some(msg) = t.queue.pop() {
        // A pending timer expiry is not lost: it stays set and is
        // reconsidered the next time this task is visited, after the
        // message queue has drained. Message delivery always wins ties.
        return Some(Dispatch::Fresh(msg));
    }
    if t.timer_flag {
        t.timer_flag = false;
        return Some(Dispatch::Fresh(Message::new(TIMER, 0, 0)));
    }
    None
}

fn run_dispatch<H: Hal>(idx: usize, plan: Dispatch) {
    with_kernel::<H, _>(|k| {
        k.current = Some(idx);
        match plan {
            Dispatch::Fresh(msg) => {
                k.tasks[idx].pending_dispatch = msg;
                k.tasks[idx].started = true;
            }
            Dispatch::Wake(reason) => {
                k.tasks[idx].sleeping = false;
                k.tasks[idx].timer_countdown = 0;
                k.tasks[idx].wake_reason = Some(reason);
            }
        }
    });

    let mut k = KERNEL.lock();
    let save_to: *mut StackPtr = &mut k.scheduler_sp as *mut StackPtr;
    let target = k.tasks[idx].saved_sp;
    drop(k);

    // `context_switch` masks internally around the actual stack swap; no
    // guard is needed here beyond the one already taken for the `KERNEL`
    // access above.
    unsafe { H::context_switch(save_to, target) };

    with_kernel::<H, _>(|k| {
        k.current = None;
        // A context switch back to the scheduler happens two ways: `entry`
        // returned all the way up to `task_trampoline` (a completed
        // dispatch, with a fresh delay word to interpret), or the task
        // suspended mid-call inside `sleep` (which already armed its own
        // timer/wake state and left `sleeping = true`). Only the former
        // case has a `pending_delay` worth applying.
        if !k.tasks[idx].sleeping {
            apply_delay(&mut k.tasks[idx], k.tasks[idx].pending_delay);
        }
    });
}

/// Translate a task's returned delay word into timer state, per the
/// sentinel table: `0` yields and is immediately runnable again on the
/// task's next ring visit, `WAIT_FOREVER` leaves the task runnable only on
/// message/explicit wake, anything else is a millisecond countdown to the
/// next `TIMER` dispatch.
fn apply_delay(t: &mut Tcb, delay: u16) {
    match delay {
        0 => {
            t.timer_countdown = 0;
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
}

/// The permanent per-task runtime loop. Every task's stack is primed by
/// `init_task_stack` to resume here on its very first dispatch; it is the
/// task's entire native call stack for its whole lifetime; it only ever
/// leaves through `Hal::context_switch`, which always lands it back here.
///
/// This plays both roles the original HAL contract names separately: it is
/// the steady-state redispatch glue (the common case, run every time
/// `entry` returns normally) and the "task-exit trampoline" (the same
/// code, reached if `entry` ever returns from a call the design doesn't
/// expect it to return from). Both land in the same place because both
/// just mean "entry finished this dispatch; report the delay and wait for
/// the next one."
pub(crate) extern "C" fn task_trampoline<H: Hal>() -> ! {
    loop {
        let idx = with_kernel::<H, _>(|k| k.current.expect("trampoline running without current"));
        let (entry, msg) = with_kernel::<H, _>(|k| (k.tasks[idx].entry, k.tasks[idx].pending_dispatch));

        let delay = entry(msg.msg_type, msg.sparam, msg.lparam);

        let (save_to, target) = {
            let mut k = KERNEL.lock();
            k.tasks[idx].pending_delay = delay;
            let save_to: *mut StackPtr = &mut k.tasks[idx].saved_sp as *mut StackPtr;
            let target = k.scheduler_sp;
            (save_to, target)
        };
        unsafe { H::context_switch(save_to, target) };
        // Resumes here once `switch_task` dispatches this task again.
    }
}

/// Run the scheduler. Installs the tick ISR, enables interrupts, and loops
/// forever calling [`switch_task`]; idles (waits for an interrupt) on any
/// visit that finds nothing runnable, which the next tick or message
/// delivery clears.
pub fn run_os<H: Hal>() -> ! {
    H::install_tick(tick::<H>);
    loop {
        if !switch_task::<H>() {
            H::wait_for_interrupt();
        }
    }
}

/// The periodic tick ISR. Decrements every task's countdown (sleeping or
/// not) and sets `timer_flag` on expiry; never itself performs a context
/// switch (preemption between tasks is explicitly out of scope), so it is
/// always safe to call from interrupt context. Runs regardless of
/// `multitask`: that flag only suppresses the scheduler's own rotation,
/// never the timer bookkeeping that keeps wake-ups accurate while it's
/// held off. Never inspects `sleeping` and never touches `wake_reason` --
/// whether a set `timer_flag` means "this sleeping task just timed out" or
/// "this task is due for a fresh TIMER dispatch" is `plan_dispatch`'s call
/// to make, not this ISR's.
pub fn tick<H: Hal>() {
    with_kernel::<H, _>(|k| {
        for i in 0..k.len {
            let t = &mut k.tasks[i];
            if t.timer_countdown == 0 {
                continue;
            }
            t.timer_countdown -= 1;
            if t.timer_countdown == 0 {
                t.timer_flag = true;
            }
        }
    });
}

/// Post a message to a task's queue. Returns `false` if the queue was
/// already full (the message is dropped, not blocked on). Safe to call
/// from the tick ISR or from another task.
pub fn send_msg<H: Hal>(task: TaskHandle, msg_type: u16, sparam: u16, lparam: i32) -> bool {
    with_kernel::<H, _>(|k| k.tasks[task.0].queue.push(Message::new(msg_type, sparam, lparam)))
}

/// Halt the CPU permanently. Used for unrecoverable kernel conditions;
/// never returns.
pub fn emergency_halt<H: Hal>(msg: &str) -> ! {
    log::error!("kdos: emergency halt: {}", msg);
    let _guard = InterruptGuard::acquire::<H>();
    loop {
        H::wait_for_interrupt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::MockHal;
    use crate::kernel::sleep::{sleep, wake, INHIBIT, PERMIT};
    use core::sync::atomic::{AtomicU32, Ordering};

    // `KERNEL` and every `MockHal` slot are process-wide statics; tests run
    // on one thread at a time against them, with `reset` putting both back
    // to a known state between cases. A poisoned lock (a prior test
    // panicking mid-scenario) must not wedge every later test, so recover
    // rather than propagate the poison.
    static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn isolated<R>(f: impl FnOnce() -> R) -> R {
        let guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        MockHal::reset();
        *KERNEL.lock() = Kernel::new();
        let result = f();
        drop(guard);
        result
    }

    #[test]
    fn init_is_every_tasks_first_dispatch() {
        isolated(|| {
            static RECORDED: spin::Mutex<Option<u16>> = spin::Mutex::new(None);
            fn entry(msg_type: u16, _s: u16, _l: i32) -> u16 {
                *RECORDED.lock() = Some(msg_type);
                WAIT_FOREVER
            }
            *RECORDED.lock() = None;

            static mut STACK: [u8; 8] = [0; 8];
            init_task::<MockHal>(entry, unsafe { &mut *(&raw mut STACK) }, 1, 1).unwrap();

            assert!(switch_task::<MockHal>());
            assert_eq!(*RECORDED.lock(), Some(INIT));
        });
    }

    // S1: A, on INIT, sends B a message; B records whatever it's handed.
    #[test]
    fn s1_echo() {
        isolated(|| {
            static RECEIVER: spin::Mutex<Option<TaskHandle>> = spin::Mutex::new(None);
            static RECORDED: spin::Mutex<Option<(u16, u16, i32)>> = spin::Mutex::new(None);
            *RECEIVER.lock() = None;
            *RECORDED.lock() = None;

            fn receiver(msg_type: u16, sparam: u16, lparam: i32) -> u16 {
                if msg_type != INIT {
                    *RECORDED.lock() = Some((msg_type, sparam, lparam));
                }
                WAIT_FOREVER
            }
            fn sender(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type == INIT {
                    if let Some(target) = *RECEIVER.lock() {
                        send_msg::<MockHal>(target, 7, 11, 22);
                    }
                }
                WAIT_FOREVER
            }

            static mut STACK_B: [u8; 8] = [0; 8];
            static mut STACK_A: [u8; 8] = [0; 8];
            let b = init_task::<MockHal>(receiver, unsafe { &mut *(&raw mut STACK_B) }, 2, 2)
                .unwrap();
            *RECEIVER.lock() = Some(b);
            init_task::<MockHal>(sender, unsafe { &mut *(&raw mut STACK_A) }, 1, 1).unwrap();

            for _ in 0..4 {
                switch_task::<MockHal>();
            }

            assert_eq!(*RECORDED.lock(), Some((7, 11, 22)));
        });
    }

    // S4: four sends against a capacity-3 queue; the fourth is dropped and
    // the task consumes exactly the first three, in order.
    #[test]
    fn s4_queue_overflow() {
        isolated(|| {
            static ORDER: spin::Mutex<[u16; 3]> = spin::Mutex::new([0; 3]);
            static COUNT: AtomicU32 = AtomicU32::new(0);
            COUNT.store(0, Ordering::SeqCst);

            fn entry(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type != INIT {
                    let i = COUNT.fetch_add(1, Ordering::SeqCst) as usize;
                    ORDER.lock()[i] = msg_type;
                }
                WAIT_FOREVER
            }

            static mut STACK: [u8; 8] = [0; 8];
            let t = init_task::<MockHal>(entry, unsafe { &mut *(&raw mut STACK) }, 3, 1).unwrap();

            assert!(send_msg::<MockHal>(t, 10, 0, 0));
            assert!(send_msg::<MockHal>(t, 11, 0, 0));
            assert!(send_msg::<MockHal>(t, 12, 0, 0));
            assert!(!send_msg::<MockHal>(t, 13, 0, 0));

            for _ in 0..4 {
                switch_task::<MockHal>();
            }

            assert_eq!(COUNT.load(Ordering::SeqCst), 3);
            assert_eq!(*ORDER.lock(), [10, 11, 12]);
        });
    }

    // S3 / R2: A sleeps forever with PERMIT; B wakes it with a non-zero
    // reason, which A must observe exactly once.
    #[test]
    fn s3_explicit_wake() {
        isolated(|| {
            static WAITER: spin::Mutex<Option<TaskHandle>> = spin::Mutex::new(None);
            static RECORDED: spin::Mutex<Option<u16>> = spin::Mutex::new(None);
            *WAITER.lock() = None;
            *RECORDED.lock() = None;

            fn waiter(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type == INIT {
                    let reason = sleep::<MockHal>(WAIT_FOREVER, PERMIT);
                    *RECORDED.lock() = Some(reason);
                }
                WAIT_FOREVER
            }
            fn waker(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type == INIT {
                    if let Some(target) = *WAITER.lock() {
                        wake::<MockHal>(target, 42);
                    }
                }
                WAIT_FOREVER
            }

            static mut STACK_WAITER: [u8; 8] = [0; 8];
            static mut STACK_WAKER: [u8; 8] = [0; 8];
            let w = init_task::<MockHal>(waiter, unsafe { &mut *(&raw mut STACK_WAITER) }, 1, 1)
                .unwrap();
            *WAITER.lock() = Some(w);
            init_task::<MockHal>(waker, unsafe { &mut *(&raw mut STACK_WAKER) }, 1, 2).unwrap();

            for _ in 0..5 {
                switch_task::<MockHal>();
            }

            assert_eq!(*RECORDED.lock(), Some(42));
        });
    }

    // S2: one task armed for a 5-tick delay on every dispatch; after 17
    // simulated ticks it has woken exactly 3 times, with a 4th pending.
    #[test]
    fn s2_tick_wake() {
        isolated(|| {
            static COUNT: AtomicU32 = AtomicU32::new(0);
            COUNT.store(0, Ordering::SeqCst);

            fn entry(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type == TIMER {
                    COUNT.fetch_add(1, Ordering::SeqCst);
                }
                5
            }

            static mut STACK: [u8; 8] = [0; 8];
            init_task::<MockHal>(entry, unsafe { &mut *(&raw mut STACK) }, 1, 1).unwrap();

            assert!(switch_task::<MockHal>()); // INIT, arms a 5-tick countdown
            for _ in 0..17 {
                tick::<MockHal>();
                switch_task::<MockHal>();
            }

            assert_eq!(COUNT.load(Ordering::SeqCst), 3);
        });
    }

    // S5: three tasks that always yield (delay 0); six ring passes give
    // each of them exactly six dispatches.
    #[test]
    fn s5_yield_fairness() {
        isolated(|| {
            static COUNTS: [AtomicU32; 3] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];
            for c in &COUNTS {
                c.store(0, Ordering::SeqCst);
            }

            fn task_a(_t: u16, _s: u16, _l: i32) -> u16 {
                COUNTS[0].fetch_add(1, Ordering::SeqCst);
                0
            }
            fn task_b(_t: u16, _s: u16, _l: i32) -> u16 {
                COUNTS[1].fetch_add(1, Ordering::SeqCst);
                0
            }
            fn task_c(_t: u16, _s: u16, _l: i32) -> u16 {
                COUNTS[2].fetch_add(1, Ordering::SeqCst);
                0
            }

            static mut STACK_A: [u8; 8] = [0; 8];
            static mut STACK_B: [u8; 8] = [0; 8];
            static mut STACK_C: [u8; 8] = [0; 8];
            init_task::<MockHal>(task_a, unsafe { &mut *(&raw mut STACK_A) }, 1, 1).unwrap();
            init_task::<MockHal>(task_b, unsafe { &mut *(&raw mut STACK_B) }, 1, 2).unwrap();
            init_task::<MockHal>(task_c, unsafe { &mut *(&raw mut STACK_C) }, 1, 3).unwrap();

            for _ in 0..18 {
                assert!(switch_task::<MockHal>());
            }

            for c in &COUNTS {
                assert_eq!(c.load(Ordering::SeqCst), 6);
            }
        });
    }

    // S6: A inhibits for 10 ticks; B and C, each holding a pending
    // message, are not touched until A's sleep returns.
    #[test]
    fn s6_switch_inhibit() {
        isolated(|| {
            static B_RAN: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);
            static C_RAN: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);
            B_RAN.store(false, Ordering::SeqCst);
            C_RAN.store(false, Ordering::SeqCst);

            fn task_a(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type == INIT {
                    sleep::<MockHal>(10, INHIBIT);
                }
                WAIT_FOREVER
            }
            fn task_b(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type != INIT {
                    B_RAN.store(true, Ordering::SeqCst);
                }
                WAIT_FOREVER
            }
            fn task_c(msg_type: u16, _s: u16, _l: i32) -> u16 {
                if msg_type != INIT {
                    C_RAN.store(true, Ordering::SeqCst);
                }
                WAIT_FOREVER
            }

            static mut STACK_A: [u8; 8] = [0; 8];
            static mut STACK_B: [u8; 8] = [0; 8];
            static mut STACK_C: [u8; 8] = [0; 8];
            init_task::<MockHal>(task_a, unsafe { &mut *(&raw mut STACK_A) }, 1, 1).unwrap();
            let b = init_task::<MockHal>(task_b, unsafe { &mut *(&raw mut STACK_B) }, 1, 2)
                .unwrap();
            let c = init_task::<MockHal>(task_c, unsafe { &mut *(&raw mut STACK_C) }, 1, 3)
                .unwrap();
            send_msg::<MockHal>(b, 99, 0, 0);
            send_msg::<MockHal>(c, 99, 0, 0);

            // A's INIT dispatch immediately inhibits; while it holds the
            // ring, repeated visits must neither dispatch B/C nor advance
            // past A.
            assert!(switch_task::<MockHal>());
            for _ in 0..9 {
                tick::<MockHal>();
                switch_task::<MockHal>();
                assert!(!B_RAN.load(Ordering::SeqCst));
                assert!(!C_RAN.load(Ordering::SeqCst));
            }
            tick::<MockHal>(); // 10th tick: A's countdown reaches 0

            // One visit wakes A and restores multitask; a few more let the
            // ring reach B and C's still-queued messages.
            for _ in 0..6 {
                switch_task::<MockHal>();
            }

            assert!(B_RAN.load(Ordering::SeqCst));
            assert!(C_RAN.load(Ordering::SeqCst));
        });
    }

    // B4: whichever of {tick, wake} sets `timer_flag` first wins; the other
    // is silently dropped. Both sides arbitrate on `timer_flag`, exactly as
    // `wake`'s guard and `tick`'s unconditional set do against each other.
    #[test]
    fn b4_first_wake_wins() {
        isolated(|| {
            static mut STACK: [u8; 8] = [0; 8];
            let handle =
                init_task::<MockHal>(|_, _, _| WAIT_FOREVER, unsafe { &mut *(&raw mut STACK) }, 1, 1)
                    .unwrap();

            // Tick first: its unconditional `timer_flag = true` wins, and
            // the default timeout reason `sleep()` would have set survives
            // untouched.
            with_kernel::<MockHal, _>(|k| {
                let t = &mut k.tasks[handle.0];
                t.sleeping = true;
                t.wake_reason = Some(WakeReason::Timer);
                t.timer_flag = false;
                t.timer_countdown = 1;
            });
            tick::<MockHal>();
            wake::<MockHal>(handle, 99);
            with_kernel::<MockHal, _>(|k| {
                assert_eq!(k.tasks[handle.0].wake_reason, Some(WakeReason::Timer));
                assert!(k.tasks[handle.0].timer_flag);
            });

            // Wake first: its guard sees `timer_flag` still clear, claims
            // the race, and `tick`'s later set of the same flag is then a
            // no-op as far as the wake reason goes.
            with_kernel::<MockHal, _>(|k| {
                let t = &mut k.tasks[handle.0];
                t.sleeping = true;
                t.wake_reason = Some(WakeReason::Timer);
                t.timer_flag = false;
                t.timer_countdown = 1;
            });
            wake::<MockHal>(handle, 99);
            tick::<MockHal>();
            with_kernel::<MockHal, _>(|k| {
                assert_eq!(
                    k.tasks[handle.0].wake_reason,
                    Some(WakeReason::Explicit(99))
                );
                assert!(k.tasks[handle.0].timer_flag);
            });
        });
    }
}
