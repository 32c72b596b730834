//! 8-bit I/O port abstraction
//!
//! Boards that wire the display bus across several GPIO ports (rather than
//! one contiguous byte) drive it through whole-port register writes.

/// An 8-bit output port register
pub trait PortRegister {
    /// Read the current output latch value
    fn read(&self) -> u8;

    /// Overwrite the output latch
    fn write(&mut self, value: u8);

    /// Set the bits in `mask`, leaving others untouched
    fn set_bits(&mut self, mask: u8) {
        let value = self.read();
        self.write(value | mask);
    }

    /// Clear the bits in `mask`, leaving others untouched
    fn clear_bits(&mut self, mask: u8) {
        let value = self.read();
        self.write(value & !mask);
    }

    /// Replace only the bits in `mask` with the corresponding bits of `bits`
    fn modify(&mut self, mask: u8, bits: u8) {
        let value = self.read();
        self.write((value & !mask) | (bits & mask));
    }
}
