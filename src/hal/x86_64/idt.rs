//! Interrupt Descriptor Table.
//!
//! Trimmed from the teacher's IDT to what a cooperative kernel with no
//! paging and no userspace actually needs: the exceptions that indicate a
//! hard bug (logged, then halt -- there is nowhere else to send the
//! fault), plus IRQ0 wired to whatever tick ISR [`install_tick`] records.
//! The teacher's syscall gate, keyboard IRQ, serial IRQ and software
//! yield interrupt (INT 0x81) are gone: this kernel has no syscalls, no
//! input drivers, and no preemption to interrupt into.

use lazy_static::lazy_static;
use spin::Mutex;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

use super::gdt::DOUBLE_FAULT_IST_INDEX;
use super::pic::pic_eoi;

/// Vector the master PIC's IRQ0 (timer) is remapped to; see `pic::init`.
pub const TIMER_VECTOR: u8 = 32;

static TICK_ISR: Mutex<Option<fn()>> = Mutex::new(None);

/// Record the function the timer vector should call on every tick. Called
/// once by [`super::X86Hal::install_tick`]; the installed ISR runs with
/// interrupts disabled, as every interrupt handler does on this backend.
pub(super) fn set_tick_isr(isr: fn()) {
    *TICK_ISR.lock() = Some(isr);
}

lazy_static! {
    static ref IDT: InterruptDescriptorTable = {
        let mut idt = InterruptDescriptorTable::new();
        idt.divide_error.set_handler_fn(fault_divide_error);
        idt.invalid_opcode.set_handler_fn(fault_invalid_opcode);
        idt.breakpoint.set_handler_fn(trap_breakpoint);
        unsafe {
            idt.double_fault
                .set_handler_fn(fault_double_fault)
                .set_stack_index(DOUBLE_FAULT_IST_INDEX);
        }
        idt.general_protection_fault.set_handler_fn(fault_gpf);
        idt.page_fault.set_handler_fn(fault_page_fault);
        idt[TIMER_VECTOR as usize].set_handler_fn(timer_interrupt);
        idt
    };
}

/// Load the IDT. Must run after [`super::gdt::init`].
pub fn init() {
    IDT.load();
}

extern "x86-interrupt" fn timer_interrupt(_frame: InterruptStackFrame) {
    if let Some(isr) = *TICK_ISR.lock() {
        isr();
    }
    unsafe { pic_eoi(0) };
}

extern "x86-interrupt" fn trap_breakpoint(frame: InterruptStackFrame) {
    log::warn!("breakpoint at {:?}", frame.instruction_pointer);
}

extern "x86-interrupt" fn fault_divide_error(frame: InterruptStackFrame) -> ! {
    log::error!("divide error at {:?}", frame.instruction_pointer);
    halt_forever()
}

extern "x86-interrupt" fn fault_invalid_opcode(frame: InterruptStackFrame) -> ! {
    log::error!("invalid opcode at {:?}", frame.instruction_pointer);
    halt_forever()
}

extern "x86-interrupt" fn fault_double_fault(frame: InterruptStackFrame, _code: u64) -> ! {
    log::error!("double fault at {:?}", frame.instruction_pointer);
    halt_forever()
}

extern "x86-interrupt" fn fault_gpf(frame: InterruptStackFrame, code: u64) {
    log::error!(
        "general protection fault (code {:#x}) at {:?}",
        code,
        frame.instruction_pointer
    );
    halt_forever()
}

extern "x86-interrupt" fn fault_page_fault(frame: InterruptStackFrame, code: PageFaultErrorCode) {
    log::error!(
        "page fault (code {:?}) at {:?}",
        code,
        frame.instruction_pointer
    );
    halt_forever()
}

fn halt_forever() -> ! {
    loop {
        x86_64::instructions::interrupts::disable();
        x86_64::instructions::hlt();
    }
}
