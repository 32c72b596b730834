//! Split-port shield bus
//!
//! Bus wiring of the 2.4" 8-bit TFT shield when stacked on a Mega-style
//! board. The eight data lines do not land on one port, so every byte is
//! scattered over three ports:
//!
//! | Data bit | Port | Port bit |
//! |----------|------|----------|
//! | D7, D6   | H    | 4, 3     |
//! | D1, D0   | H    | 6, 5     |
//! | D3, D2   | E    | 5, 4     |
//! | D5       | E    | 3        |
//! | D4       | G    | 5        |
//!
//! Control lines share port F: write strobe on bit 1, data/command on
//! bit 2, chip select on bit 3 and reset on bit 4. Strobe and chip select
//! are active low.

use shieldfill_hal::{DisplayBus, PortRegister};

/// Data bits owned by the bus on port H
const H_MASK: u8 = 0x78;
/// Data bits owned by the bus on port E
const E_MASK: u8 = 0x38;
/// Data bits owned by the bus on port G
const G_MASK: u8 = 0x20;

/// Control port F bits
mod ctrl {
    pub const WR: u8 = 0x02;
    pub const DC: u8 = 0x04;
    pub const CS: u8 = 0x08;
    pub const RST: u8 = 0x10;
}

/// Port values that place one byte on the shield bus
///
/// Bits outside the bus masks carry whatever the ports held when the
/// value was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShieldLines {
    pub h: u8,
    pub e: u8,
    pub g: u8,
}

/// Port H bits for `byte`
const fn h_bits(byte: u8) -> u8 {
    ((byte & 0xC0) >> 3) | ((byte & 0x03) << 5)
}

/// Port E bits for `byte`
const fn e_bits(byte: u8) -> u8 {
    ((byte & 0x0C) << 2) | ((byte & 0x20) >> 2)
}

/// Port G bits for `byte`
const fn g_bits(byte: u8) -> u8 {
    (byte & 0x10) << 1
}

/// 8-bit display bus spread over three data ports and one control port
pub struct ShieldBus<H, E, G, F> {
    h: H,
    e: E,
    g: G,
    f: F,
}

impl<H, E, G, F> ShieldBus<H, E, G, F>
where
    H: PortRegister,
    E: PortRegister,
    G: PortRegister,
    F: PortRegister,
{
    /// Take the ports and park the control lines idle
    ///
    /// Strobe, data/command, chip select and reset are all driven high:
    /// deselected, not writing, out of reset.
    pub fn new(h: H, e: E, g: G, mut f: F) -> Self {
        f.set_bits(ctrl::WR | ctrl::DC | ctrl::CS | ctrl::RST);
        Self { h, e, g, f }
    }

    /// Give the ports back
    pub fn release(self) -> (H, E, G, F) {
        (self.h, self.e, self.g, self.f)
    }
}

impl<H, E, G, F> DisplayBus for ShieldBus<H, E, G, F>
where
    H: PortRegister,
    E: PortRegister,
    G: PortRegister,
    F: PortRegister,
{
    type Lines = ShieldLines;

    fn encode(&self, byte: u8) -> ShieldLines {
        ShieldLines {
            h: (self.h.read() & !H_MASK) | h_bits(byte),
            e: (self.e.read() & !E_MASK) | e_bits(byte),
            g: (self.g.read() & !G_MASK) | g_bits(byte),
        }
    }

    #[inline(always)]
    fn latch(&mut self, lines: ShieldLines) {
        self.h.write(lines.h);
        self.e.write(lines.e);
        self.g.write(lines.g);
    }

    #[inline(always)]
    fn strobe(&mut self) {
        self.f.clear_bits(ctrl::WR);
        self.f.set_bits(ctrl::WR);
    }

    fn command_mode(&mut self) {
        self.f.clear_bits(ctrl::DC);
    }

    fn data_mode(&mut self) {
        self.f.set_bits(ctrl::DC);
    }

    fn select(&mut self) {
        self.f.clear_bits(ctrl::CS);
    }

    fn deselect(&mut self) {
        self.f.set_bits(ctrl::CS);
    }
}
