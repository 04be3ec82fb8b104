//! Host-side test backend.
//!
//! Real tasks in this kernel are stackful coroutines: `sleep()` can suspend
//! execution from anywhere inside a running `entry` call and resume right
//! there. On the host we have no inline assembly to swap a raw stack
//! pointer, so each "task" is instead a real OS thread, and `context_switch`
//! is a rendezvous handoff between exactly one running thread and one
//! parked thread. At any instant at most one side is unparked, which is the
//! same single-CPU exclusion the kernel core otherwise gets from masked
//! interrupts.
extern crate std;

use std::boxed::Box;
use std::collections::BTreeMap;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};

use super::{Hal, InterruptState, StackPtr};

struct Slot {
    resume_tx: SyncSender<()>,
    resume_rx: Mutex<Receiver<()>>,
}

static SLOTS: Mutex<BTreeMap<usize, Arc<Slot>>> = Mutex::new(BTreeMap::new());
static NEXT_SLOT: Mutex<usize> = Mutex::new(1);

std::thread_local! {
    static CURRENT_SLOT: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

fn new_slot() -> usize {
    let mut next = NEXT_SLOT.lock().unwrap();
    let id = *next;
    *next += 1;
    let (tx, rx) = sync_channel(1);
    SLOTS.lock().unwrap().insert(
        id,
        Arc::new(Slot {
            resume_tx: tx,
            resume_rx: Mutex::new(rx),
        }),
    );
    id
}

fn find_slot(id: usize) -> Arc<Slot> {
    SLOTS
        .lock()
        .unwrap()
        .get(&id)
        .expect("mock: unknown slot")
        .clone()
}

fn signal(id: usize) {
    // Clone the Arc and drop the map lock before sending: the receiver may
    // already be parked and ready to wake the instant it's signaled.
    let slot = find_slot(id);
    // Buffered by one: the sender doesn't need the receiver parked yet.
    let _ = slot.resume_tx.send(());
}

fn park_current() {
    let id = CURRENT_SLOT.with(|c| c.get());
    let slot = find_slot(id);
    slot.resume_rx.lock().unwrap().recv().expect("park: sender dropped");
}

/// Reserved slot id for whichever execution context calls `start_scheduler`.
pub const SCHEDULER_SLOT: usize = 0;

/// Host test backend. Interrupt masking is a no-op (there is only ever one
/// logical runner active at a time by construction of the rendezvous
/// channels); the tick ISR is driven explicitly by tests calling
/// `fire_tick()` rather than by a real timer.
pub struct MockHal;

static TICK_ISR: Mutex<Option<fn()>> = Mutex::new(None);

impl MockHal {
    /// Test helper: invoke the installed tick ISR synchronously, as if a
    /// timer interrupt had just fired.
    pub fn fire_tick() {
        if let Some(isr) = *TICK_ISR.lock().unwrap() {
            isr();
        }
    }

    /// Reset all global mock state between tests.
    pub fn reset() {
        *SLOTS.lock().unwrap() = BTreeMap::new();
        *NEXT_SLOT.lock().unwrap() = 1;
        *TICK_ISR.lock().unwrap() = None;
        SLOTS.lock().unwrap().insert(
            SCHEDULER_SLOT,
            Arc::new(Slot {
                resume_tx: sync_channel(1).0,
                resume_rx: Mutex::new(sync_channel(1).1),
            }),
        );
        CURRENT_SLOT.with(|c| c.set(SCHEDULER_SLOT));
    }
}

impl Hal for MockHal {
    fn mask_interrupts() -> InterruptState {
        InterruptState(true)
    }

    fn unmask_interrupts(_state: InterruptState) {}

    fn init_task_stack(_stack: &mut [u8], trampoline: extern "C" fn() -> !) -> Option<StackPtr> {
        let id = new_slot();
        std::thread::Builder::new()
            .name(std::format!("kdos-task-{id}"))
            .spawn(move || {
                CURRENT_SLOT.with(|c| c.set(id));
                park_current();
                trampoline();
            })
            .expect("spawn mock task thread");
        Some(StackPtr(id as *mut u8))
    }

    unsafe fn context_switch(save_to: *mut StackPtr, load_from: StackPtr) {
        let my_id = CURRENT_SLOT.with(|c| c.get());
        unsafe {
            *save_to = StackPtr(my_id as *mut u8);
        }
        signal(load_from.0 as usize);
        park_current();
    }

    fn install_tick(isr: fn()) {
        *TICK_ISR.lock().unwrap() = Some(isr);
    }

    fn wait_for_interrupt() {
        std::thread::yield_now();
    }
}

// Avoid an unused warning when the `mock-hal` feature is on but nothing
// else in this module is reached (Box import only used indirectly above on
// some platforms' thread::Builder::spawn error type).
#[allow(dead_code)]
fn _keep_box_import(_: Box<()>) {}
