//! Stack-swapping context switch and initial-frame construction.
//!
//! Shaped after the teacher's interrupt-driven switch (push every GPR,
//! hand the old stack pointer to a scheduling call, resume on whatever
//! stack pointer comes back, pop every GPR) but reached through an
//! ordinary call/ret pair instead of an interrupt/iretq pair: nothing
//! here runs from an interrupt context, so there is no CPU-pushed frame
//! to match and no `iretq` to fall back into.

use core::arch::naked_asm;

use crate::hal::StackPtr;

/// One full saved context: 15 GPRs (everything but `rsp`, which is what
/// gets swapped) plus `rflags`, plus the return address `ret` consumes on
/// resume. 17 eight-byte words.
pub const FRAME_BYTES: usize = 17 * 8;

/// Lay out a brand-new task's stack so the first [`switch`] into it
/// resumes at `entry_trampoline` with interrupts enabled and a garbage
/// (but initialized) register file. Returns `None` if `stack` can't hold
/// one frame after 16-byte alignment.
pub fn init_stack(stack: &mut [u8], entry_trampoline: extern "C" fn() -> !) -> Option<StackPtr> {
    let base = stack.as_mut_ptr() as usize;
    let top = base.checked_add(stack.len())?;
    let aligned_top = top & !0xf;
    // FRAME_BYTES (136) is 8 mod 16, so subtracting it from a 16-aligned
    // top leaves an 8-mod-16 address; round down again so `frame_start`
    // itself is 16-aligned and `frame_start + FRAME_BYTES` lands on the
    // 8-mod-16 address `ret` needs (SysV: rsp == 8 mod 16 at fn entry).
    let frame_start = aligned_top.checked_sub(FRAME_BYTES)? & !0xf;
    if frame_start < base {
        return None;
    }

    // SAFETY: `frame_start .. frame_start + FRAME_BYTES` lies inside
    // `stack`, is 16-byte aligned, and every word below is in range.
    unsafe {
        let words = frame_start as *mut u64;
        // r15, r14, r13, r12, r11, r10, r9, r8, rbp, rdi, rsi, rdx, rcx,
        // rbx, rax: nothing reads these before `entry_trampoline`'s own
        // prologue overwrites them, so zero is as good as anything.
        for i in 0..15 {
            words.add(i).write(0);
        }
        words.add(15).write(0x202); // rflags: reserved bit 1, IF set
        words.add(16).write(entry_trampoline as usize as u64);
    }
    Some(StackPtr(frame_start as *mut u8))
}

/// Swap the running stack into `*save_to`, resume on `load_from`.
///
/// # Safety
/// See [`crate::hal::Hal::context_switch`].
pub unsafe fn switch(save_to: *mut StackPtr, load_from: StackPtr) {
    unsafe { raw_switch(save_to.cast(), load_from.0) }
}

#[unsafe(naked)]
unsafe extern "C" fn raw_switch(save_to: *mut *mut u8, load_from: *mut u8) {
    naked_asm!(
        "pushfq",
        "push rax",
        "push rbx",
        "push rcx",
        "push rdx",
        "push rsi",
        "push rdi",
        "push rbp",
        "push r8",
        "push r9",
        "push r10",
        "push r11",
        "push r12",
        "push r13",
        "push r14",
        "push r15",
        "mov [rdi], rsp",
        "mov rsp, rsi",
        "pop r15",
        "pop r14",
        "pop r13",
        "pop r12",
        "pop r11",
        "pop r10",
        "pop r9",
        "pop r8",
        "pop rbp",
        "pop rdi",
        "pop rsi",
        "pop rdx",
        "pop rcx",
        "pop rbx",
        "pop rax",
        "popfq",
        "ret",
    )
}
