//! Programmable Interval Timer: arms channel 0 to fire IRQ0 at 1 kHz, the
//! 1 ms cadence [`crate::kernel::scheduler::tick`] assumes throughout.

use x86_64::instructions::port::Port;

const CHANNEL_0: u16 = 0x40;
const COMMAND: u16 = 0x43;
const BASE_FREQUENCY_HZ: u32 = 1_193_182;
const TARGET_FREQUENCY_HZ: u32 = 1_000;

/// Channel 0, lobyte/hibyte access, mode 3 (square wave generator).
const MODE_COMMAND: u8 = 0b0011_0110;

pub fn init() {
    let divisor = (BASE_FREQUENCY_HZ / TARGET_FREQUENCY_HZ) as u16;

    let mut command: Port<u8> = Port::new(COMMAND);
    let mut channel0: Port<u8> = Port::new(CHANNEL_0);

    unsafe {
        command.write(MODE_COMMAND);
        channel0.write((divisor & 0xFF) as u8);
        channel0.write((divisor >> 8) as u8);
    }
}
