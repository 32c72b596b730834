//! Pixel colors and their bus encoding
//!
//! The controller runs in 16 bits per pixel (RGB565). Each pixel is
//! clocked out as two bytes, high first. Turning a byte into line values
//! is a bit shuffle that is far too slow to redo per pixel, so a
//! [`PixelPattern`] is built once per draw call and replayed.

use shieldfill_hal::DisplayBus;

/// 16-bit RGB565 color word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);

    /// Pack 8-bit channels into RGB565
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Byte sent first
    pub const fn high(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Byte sent second
    pub const fn low(self) -> u8 {
        self.0 as u8
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

/// Precomputed bus line values for one color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPattern<L> {
    high: L,
    low: L,
}

impl<L: Copy> PixelPattern<L> {
    /// Encode both halves of `color` for `bus`
    pub fn new<B>(bus: &B, color: Color) -> Self
    where
        B: DisplayBus<Lines = L>,
    {
        Self {
            high: bus.encode(color.high()),
            low: bus.encode(color.low()),
        }
    }

    /// Clock out one pixel
    #[inline(always)]
    pub fn emit<B>(&self, bus: &mut B)
    where
        B: DisplayBus<Lines = L>,
    {
        bus.write_word(self.high, self.low);
    }

    /// Clock out `count` identical pixels
    #[inline]
    pub fn emit_n<B>(&self, bus: &mut B, count: u32)
    where
        B: DisplayBus<Lines = L>,
    {
        for _ in 0..count {
            bus.write_word(self.high, self.low);
        }
    }
}
