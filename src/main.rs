//! KDOS demo boot image: a raw x86_64 entry point that brings up the
//! [`kdos::hal::x86_64`] backend and hands off to five long-lived tasks
//! exercising every dispatch path the kernel core defines -- INIT, a sent
//! message, a tick-driven wakeup, and an explicit wake -- then calls
//! `run_os`, which never returns.
//!
//! Assumes it is loaded already in 64-bit long mode with paging and a
//! stack set up by the boot chain (e.g. a multiboot2-aware loader); KDOS
//! itself has no paging or multicore bring-up to do (both are explicitly
//! out of scope), so there is nothing here beyond switching onto our own
//! stack and jumping into Rust.

#![no_std]
#![no_main]

use core::panic::PanicInfo;

use kdos::hal::x86_64::X86Hal;
use kdos::{
    init_task, run_os, send_msg, sleep, wake, TaskHandle, INIT, PERMIT, TIMER, WAIT_FOREVER,
};

#[repr(C, align(16))]
struct BootStack([u8; 16 * 1024]);

#[unsafe(no_mangle)]
static mut BOOT_STACK: BootStack = BootStack([0; 16 * 1024]);

#[unsafe(naked)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _start() -> ! {
    core::arch::naked_asm!(
        "lea rax, [rip + BOOT_STACK]",
        "add rax, {stack_size}",
        "mov rsp, rax",
        "jmp kstart",
        stack_size = const 16 * 1024,
    );
}

static mut STACK_SENDER: [u8; 512] = [0; 512];
static mut STACK_RECEIVER: [u8; 512] = [0; 512];
static mut STACK_TICKER: [u8; 512] = [0; 512];
static mut STACK_WAITER: [u8; 512] = [0; 512];
static mut STACK_WAKER: [u8; 512] = [0; 512];

static RECEIVER: spin::Mutex<Option<TaskHandle>> = spin::Mutex::new(None);
static WAITER: spin::Mutex<Option<TaskHandle>> = spin::Mutex::new(None);

/// On INIT, sends one message to [`echo_receiver`] and goes quiet. Traces
/// the scenario where a task's only job is to kick off another task's
/// work and then wait forever.
fn echo_sender(msg_type: u16, _sparam: u16, _lparam: i32) -> u16 {
    if msg_type == INIT {
        if let Some(target) = *RECEIVER.lock() {
            send_msg::<X86Hal>(target, 7, 11, 22);
        }
    }
    WAIT_FOREVER
}

/// Logs every message it's handed and otherwise does nothing; never
/// times out, so it only ever runs on INIT or a delivered message.
fn echo_receiver(msg_type: u16, sparam: u16, lparam: i32) -> u16 {
    if msg_type != INIT {
        log::info!("echo_receiver: ({msg_type}, {sparam}, {lparam})");
    }
    WAIT_FOREVER
}

/// Returns a fixed 500-tick delay every time it runs, so it is
/// redispatched with TIMER roughly every half second for as long as the
/// system is up.
fn ticker(msg_type: u16, _sparam: u16, _lparam: i32) -> u16 {
    static COUNT: spin::Mutex<u32> = spin::Mutex::new(0);
    if msg_type == TIMER {
        let mut count = COUNT.lock();
        *count += 1;
        log::info!("ticker: wake #{count}");
    }
    500
}

/// Blocks inside its own INIT dispatch on `sleep(WAIT_FOREVER, ...)`
/// until [`waker`] wakes it explicitly, then logs the wake reason it got
/// back and goes quiet for good.
fn waiter(msg_type: u16, _sparam: u16, _lparam: i32) -> u16 {
    if msg_type == INIT {
        let reason = sleep::<X86Hal>(WAIT_FOREVER, PERMIT);
        log::info!("waiter: woke with reason {reason}");
    }
    WAIT_FOREVER
}

/// Sleeps two seconds via the ordinary delay-word path, then wakes
/// [`waiter`] with a non-zero reason and goes quiet.
fn waker(msg_type: u16, _sparam: u16, _lparam: i32) -> u16 {
    match msg_type {
        INIT => 2000,
        TIMER => {
            if let Some(target) = *WAITER.lock() {
                wake::<X86Hal>(target, 42);
            }
            WAIT_FOREVER
        }
        _ => WAIT_FOREVER,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn kstart() -> ! {
    kdos::hal::x86_64::init();
    log::info!("kdos: boot");

    let receiver = spawn(echo_receiver, unsafe { &mut *(&raw mut STACK_RECEIVER) }, 2, 2);
    *RECEIVER.lock() = Some(receiver);
    spawn(echo_sender, unsafe { &mut *(&raw mut STACK_SENDER) }, 1, 1);
    spawn(ticker, unsafe { &mut *(&raw mut STACK_TICKER) }, 1, 3);
    let waiter_handle = spawn(waiter, unsafe { &mut *(&raw mut STACK_WAITER) }, 1, 4);
    *WAITER.lock() = Some(waiter_handle);
    spawn(waker, unsafe { &mut *(&raw mut STACK_WAKER) }, 1, 5);

    log::info!("kdos: tasks created, starting scheduler");
    run_os::<X86Hal>();
}

fn spawn(
    entry: kdos::TaskEntry,
    stack: &'static mut [u8],
    queue_len: usize,
    id: u8,
) -> TaskHandle {
    match init_task::<X86Hal>(entry, stack, queue_len, id) {
        Ok(handle) => handle,
        Err(e) => kdos::kernel::scheduler::emergency_halt::<X86Hal>(
            match e {
                kdos::KernelError::TaskArenaFull => "task arena full",
                kdos::KernelError::StackAllocFailed => "stack too small for initial frame",
                kdos::KernelError::QueueCapacityZero => "queue capacity must be nonzero",
            },
        ),
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    x86_64::instructions::interrupts::disable();
    log::error!("panic: {info}");
    loop {
        x86_64::instructions::hlt();
    }
}
