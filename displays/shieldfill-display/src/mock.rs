//! Mock bus and interrupt mask for renderer tests

use core::cell::Cell;

use heapless::Vec;
use shieldfill_hal::{DisplayBus, InterruptMask};

use crate::window::Window;

/// Recorded bus activity, pixel words excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Select,
    Deselect,
    Command(u8),
    Data(u8),
    DataMode,
}

/// Bus that records commands and counts pixel words
///
/// Shares the `masked` flag with [`MockMask`] so tests can assert that
/// nothing reached the bus outside a masked section.
pub struct MockBus<'a> {
    masked: &'a Cell<bool>,
    pub events: Vec<BusEvent, 512>,
    pub encodes: Cell<u32>,
    pub pixels: u32,
    pub last_word: Option<(u8, u8)>,
    pub strobes: u32,
    pub latched: Option<u8>,
    pub unmasked: u32,
}

impl<'a> MockBus<'a> {
    pub fn new(masked: &'a Cell<bool>) -> Self {
        Self {
            masked,
            events: Vec::new(),
            encodes: Cell::new(0),
            pixels: 0,
            last_word: None,
            strobes: 0,
            latched: None,
            unmasked: 0,
        }
    }

    fn record(&mut self, event: BusEvent) {
        self.check_masked();
        self.events.push(event).expect("mock bus event log full");
    }

    fn check_masked(&mut self) {
        if !self.masked.get() {
            self.unmasked += 1;
        }
    }

    /// Windows set through column/page commands, in order
    pub fn windows(&self, opcodes_column: u8, opcodes_page: u8) -> Vec<Window, 32> {
        let mut windows = Vec::new();
        let mut x = None;
        let events = self.events.as_slice();

        for (i, event) in events.iter().enumerate() {
            let args = || -> Option<(u16, u16)> {
                let mut bytes = [0u8; 4];
                for (slot, event) in bytes.iter_mut().zip(events.get(i + 1..i + 5)?) {
                    match event {
                        BusEvent::Data(byte) => *slot = *byte,
                        _ => return None,
                    }
                }
                Some((
                    u16::from_be_bytes([bytes[0], bytes[1]]),
                    u16::from_be_bytes([bytes[2], bytes[3]]),
                ))
            };

            match *event {
                BusEvent::Command(c) if c == opcodes_column => x = args(),
                BusEvent::Command(c) if c == opcodes_page => {
                    if let (Some((x1, x2)), Some((y1, y2))) = (x.take(), args()) {
                        windows
                            .push(Window::new(x1, x2, y1, y2))
                            .expect("mock window log full");
                    }
                }
                _ => {}
            }
        }
        windows
    }
}

impl DisplayBus for MockBus<'_> {
    type Lines = u8;

    fn encode(&self, byte: u8) -> u8 {
        self.encodes.set(self.encodes.get() + 1);
        byte
    }

    fn latch(&mut self, byte: u8) {
        self.check_masked();
        self.latched = Some(byte);
    }

    fn strobe(&mut self) {
        self.check_masked();
        self.strobes += 1;
    }

    fn command_mode(&mut self) {}

    fn data_mode(&mut self) {
        self.record(BusEvent::DataMode);
    }

    fn select(&mut self) {
        self.record(BusEvent::Select);
    }

    fn deselect(&mut self) {
        self.record(BusEvent::Deselect);
    }

    fn send_command(&mut self, command: u8) {
        self.record(BusEvent::Command(command));
    }

    fn send_data(&mut self, data: u8) {
        self.record(BusEvent::Data(data));
    }

    fn write_word(&mut self, high: u8, low: u8) {
        self.check_masked();
        self.pixels += 1;
        self.last_word = Some((high, low));
    }
}

/// Interrupt mask that flips a shared flag and counts entries
pub struct MockMask<'a> {
    masked: &'a Cell<bool>,
    pub entries: u32,
}

impl<'a> MockMask<'a> {
    pub fn new(masked: &'a Cell<bool>) -> Self {
        Self { masked, entries: 0 }
    }
}

impl InterruptMask for MockMask<'_> {
    fn free<R>(&mut self, f: impl FnOnce() -> R) -> R {
        self.entries += 1;
        let previous = self.masked.replace(true);
        let result = f();
        self.masked.set(previous);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "mock bus event log full")]
    fn test_full_event_log_panics() {
        let masked = Cell::new(true);
        let mut bus = MockBus::new(&masked);
        for _ in 0..=512 {
            bus.send_data(0);
        }
    }

    #[test]
    fn test_windows_parses_column_then_page() {
        let masked = Cell::new(true);
        let mut bus = MockBus::new(&masked);
        bus.send_command(0x2A);
        for byte in [0, 3, 0, 7] {
            bus.send_data(byte);
        }
        bus.send_command(0x2B);
        for byte in [0, 9, 1, 0] {
            bus.send_data(byte);
        }

        assert_eq!(bus.windows(0x2A, 0x2B).as_slice(), &[Window::new(3, 7, 9, 256)]);
    }
}
