//! The demo x86_64 backend: the one concrete [`crate::hal::Hal`]
//! implementation this crate ships, wiring the kernel core to a real GDT,
//! IDT, 8259 PIC, PIT and a stack-swapping context switch.
//!
//! Everything architecture-specific lives under here; [`crate::kernel`]
//! never imports from this module directly, only through the `Hal` trait
//! object `X86Hal` is passed as.

mod context;
mod gdt;
mod idt;
mod logger;
mod pic;
mod pit;
pub mod serial;

use x86_64::instructions::interrupts;

use crate::hal::{Hal, InterruptState, StackPtr};

/// Bring up the serial port, logger, segments and interrupt handlers a
/// boot sequence needs before calling
/// [`crate::kernel::run_os::<X86Hal>`]. Does not touch the PIT or enable
/// interrupts; [`X86Hal::install_tick`] (called from inside `run_os`)
/// does that once the scheduler is ready to receive ticks.
pub fn init() {
    serial::init();
    logger::init();
    gdt::init();
    idt::init();
    pic::init();
}

/// Marker type selecting the real-hardware backend at `run_os::<X86Hal>`.
pub struct X86Hal;

impl Hal for X86Hal {
    fn mask_interrupts() -> InterruptState {
        let was_enabled = interrupts::are_enabled();
        interrupts::disable();
        InterruptState(was_enabled)
    }

    fn unmask_interrupts(state: InterruptState) {
        if state.0 {
            interrupts::enable();
        }
    }

    fn init_task_stack(stack: &mut [u8], trampoline: extern "C" fn() -> !) -> Option<StackPtr> {
        context::init_stack(stack, trampoline)
    }

    unsafe fn context_switch(save_to: *mut StackPtr, load_from: StackPtr) {
        unsafe { context::switch(save_to, load_from) }
    }

    fn install_tick(isr: fn()) {
        idt::set_tick_isr(isr);
        pit::init();
        interrupts::enable();
    }

    fn wait_for_interrupt() {
        x86_64::instructions::hlt();
    }
}
