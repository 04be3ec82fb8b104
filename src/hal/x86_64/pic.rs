//! 8259 PIC: remapped so IRQ0..15 land on vectors 32..47 (clear of the CPU
//! exception range), with every line but IRQ0 (the tick) masked off --
//! this kernel has no keyboard or serial interrupt handlers to route to.

use x86_64::instructions::port::Port;

const MASTER_CMD: u16 = 0x20;
const MASTER_DATA: u16 = 0x21;
const SLAVE_CMD: u16 = 0xA0;
const SLAVE_DATA: u16 = 0xA1;

const ICW1_INIT: u8 = 0x11;
const ICW4_8086: u8 = 0x01;
const EOI: u8 = 0x20;

pub fn init() {
    let mut master_cmd: Port<u8> = Port::new(MASTER_CMD);
    let mut master_data: Port<u8> = Port::new(MASTER_DATA);
    let mut slave_cmd: Port<u8> = Port::new(SLAVE_CMD);
    let mut slave_data: Port<u8> = Port::new(SLAVE_DATA);

    unsafe {
        master_cmd.write(ICW1_INIT);
        slave_cmd.write(ICW1_INIT);

        master_data.write(super::idt::TIMER_VECTOR); // master PIC base vector
        slave_data.write(super::idt::TIMER_VECTOR + 8); // slave PIC base vector

        master_data.write(0x04); // slave wired on IRQ2
        slave_data.write(0x02); // cascade identity

        master_data.write(ICW4_8086);
        slave_data.write(ICW4_8086);

        // Unmask IRQ0 (timer) only.
        master_data.write(0xFE);
        slave_data.write(0xFF);
    }
}

/// Send End-Of-Interrupt. `irq` >= 8 also needs the slave PIC acknowledged.
pub unsafe fn pic_eoi(irq: u8) {
    if irq >= 8 {
        unsafe { Port::<u8>::new(SLAVE_CMD).write(EOI) };
    }
    unsafe { Port::<u8>::new(MASTER_CMD).write(EOI) };
}
