//! Polling UART driver for COM1, used only to back the `log` output this
//! demo backend writes diagnostics to. Adapted from the teacher's 16550
//! driver: the original went through a hand-rolled `Io`/`Pio` port
//! abstraction (`syscall::io`, `syscall::pio`) that existed to support a
//! second, MMIO-backed port implementation this kernel never needs;
//! talking to `x86_64::instructions::port::Port` directly, the same crate
//! [`super::pic`] and [`super::pit`] already use, drops that layer.

use bitflags::bitflags;
use spin::Mutex;
use x86_64::instructions::port::Port;

bitflags! {
    struct LineSts: u8 {
        const OUTPUT_EMPTY = 1 << 5;
    }
}

const COM1: u16 = 0x3F8;

pub struct SerialPort {
    data: Port<u8>,
    int_en: Port<u8>,
    fifo_ctrl: Port<u8>,
    line_ctrl: Port<u8>,
    modem_ctrl: Port<u8>,
    line_sts: Port<u8>,
}

impl SerialPort {
    const fn new(base: u16) -> Self {
        SerialPort {
            data: Port::new(base),
            int_en: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_sts: Port::new(base + 5),
        }
    }

    fn init(&mut self) {
        unsafe {
            self.int_en.write(0x00);
            self.line_ctrl.write(0x80); // enable DLAB
            self.data.write(0x01); // divisor low: 115200 baud
            self.int_en.write(0x00); // divisor high
            self.line_ctrl.write(0x03); // 8N1, DLAB off
            self.fifo_ctrl.write(0xC7); // enable + clear FIFOs, 14-byte threshold
            self.modem_ctrl.write(0x0B); // RTS/DSR set, enable IRQs (unused: masked at the PIC)
        }
    }

    fn line_status(&mut self) -> LineSts {
        LineSts::from_bits_truncate(unsafe { self.line_sts.read() })
    }

    fn write_byte(&mut self, byte: u8) {
        while !self.line_status().contains(LineSts::OUTPUT_EMPTY) {}
        unsafe { self.data.write(byte) };
    }
}

impl core::fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            match byte {
                b'\n' => {
                    self.write_byte(b'\r');
                    self.write_byte(b'\n');
                }
                byte => self.write_byte(byte),
            }
        }
        Ok(())
    }
}

static COM1_PORT: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1));

pub fn init() {
    COM1_PORT.lock().init();
}

pub fn write_fmt(args: core::fmt::Arguments) {
    use core::fmt::Write;
    let _ = COM1_PORT.lock().write_fmt(args);
}
