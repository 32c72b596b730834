//! GPIO parallel bus
//!
//! Drives an 8-bit parallel controller from individual `embedded-hal`
//! output pins. Slower than whole-port writes, but works with any chip
//! whose HAL exposes infallible push-pull outputs.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use shieldfill_hal::DisplayBus;

/// Drive an infallible pin to `high`
#[inline(always)]
fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, high: bool) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    match result {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// 8-bit display bus over discrete GPIO pins
///
/// `data[0]` is D0. Write strobe and chip select are active low;
/// data/command is high for data.
pub struct GpioBus<D, DC, WR, CS> {
    data: [D; 8],
    dc: DC,
    wr: WR,
    cs: CS,
    /// Byte currently on the data pins, if known
    latched: Option<u8>,
}

impl<D, DC, WR, CS> GpioBus<D, DC, WR, CS>
where
    D: OutputPin<Error = Infallible>,
    DC: OutputPin<Error = Infallible>,
    WR: OutputPin<Error = Infallible>,
    CS: OutputPin<Error = Infallible>,
{
    /// Take the pins and park the control lines idle
    pub fn new(data: [D; 8], mut dc: DC, mut wr: WR, mut cs: CS) -> Self {
        drive(&mut wr, true);
        drive(&mut dc, true);
        drive(&mut cs, true);
        Self {
            data,
            dc,
            wr,
            cs,
            latched: None,
        }
    }

    /// Give the pins back
    pub fn release(self) -> ([D; 8], DC, WR, CS) {
        (self.data, self.dc, self.wr, self.cs)
    }
}

impl<D, DC, WR, CS> DisplayBus for GpioBus<D, DC, WR, CS>
where
    D: OutputPin<Error = Infallible>,
    DC: OutputPin<Error = Infallible>,
    WR: OutputPin<Error = Infallible>,
    CS: OutputPin<Error = Infallible>,
{
    type Lines = u8;

    fn encode(&self, byte: u8) -> u8 {
        byte
    }

    fn latch(&mut self, byte: u8) {
        // Only touch pins whose level changes
        let changed = match self.latched {
            Some(previous) => previous ^ byte,
            None => 0xFF,
        };
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if changed & (1 << bit) != 0 {
                drive(pin, byte & (1 << bit) != 0);
            }
        }
        self.latched = Some(byte);
    }

    fn strobe(&mut self) {
        drive(&mut self.wr, false);
        drive(&mut self.wr, true);
    }

    fn command_mode(&mut self) {
        drive(&mut self.dc, false);
    }

    fn data_mode(&mut self) {
        drive(&mut self.dc, true);
    }

    fn select(&mut self) {
        drive(&mut self.cs, false);
    }

    fn deselect(&mut self) {
        drive(&mut self.cs, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
        /// Number of set calls
        writes: u32,
        /// Number of low-to-high transitions
        rises: u32,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.rises += 1;
            }
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    type TestBus = GpioBus<MockPin, MockPin, MockPin, MockPin>;

    fn bus() -> TestBus {
        GpioBus::new(
            core::array::from_fn(|_| MockPin::default()),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        )
    }

    fn data_byte(data: &[MockPin; 8]) -> u8 {
        data.iter()
            .enumerate()
            .fold(0, |acc, (bit, pin)| acc | ((pin.high as u8) << bit))
    }

    #[test]
    fn test_new_parks_control_lines() {
        let (_, dc, wr, cs) = bus().release();
        assert!(dc.high);
        assert!(wr.high);
        assert!(cs.high);
    }

    #[test]
    fn test_write_byte_sets_pins_and_strobes() {
        let mut bus = bus();
        bus.write_byte(0b1010_0101);

        let (data, _, wr, _) = bus.release();
        assert_eq!(data_byte(&data), 0b1010_0101);
        // One rise from parking, one from the strobe
        assert_eq!(wr.rises, 2);
        assert!(wr.high);
    }

    #[test]
    fn test_latch_skips_unchanged_pins() {
        let mut bus = bus();
        bus.latch(0x0F);
        bus.latch(0x0E);

        let (data, _, _, _) = bus.release();
        assert_eq!(data_byte(&data), 0x0E);
        // First latch drives every pin, second only D0
        assert_eq!(data[0].writes, 2);
        assert_eq!(data[1].writes, 1);
        assert_eq!(data[7].writes, 1);
    }

    #[test]
    fn test_command_then_data() {
        let mut bus = bus();
        bus.select();
        bus.send_command(0x2A);
        assert!(!bus.dc.high);
        assert!(!bus.cs.high);
        bus.send_data(0x00);
        bus.deselect();

        let (_, dc, wr, cs) = bus.release();
        assert!(dc.high);
        assert!(cs.high);
        assert_eq!(wr.rises, 3);
    }

    #[test]
    fn test_encode_is_identity() {
        let bus = bus();
        assert_eq!(bus.encode(0x5A), 0x5A);
    }
}
