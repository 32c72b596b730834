//! Parallel display bus abstraction
//!
//! An 8-bit parallel controller interface is driven by three control
//! signals (chip select, data/command, write strobe) and eight data lines.
//! Every operation here is a fixed-latency side effect with no return
//! value; callers depend only on ordering.

/// 8-bit parallel bus to a display controller
///
/// Implementors describe how a byte maps onto their physical lines via
/// [`DisplayBus::Lines`]. Encoding is split from latching so the hot pixel
/// loop can replay precomputed line values without redoing the bit
/// shuffle for every word.
pub trait DisplayBus {
    /// Exact line (or port) values that put one byte on the bus
    type Lines: Copy;

    /// Compute the line values for `byte`
    ///
    /// May sample the current port state so that bits not belonging to
    /// the bus are preserved when the value is later latched.
    fn encode(&self, byte: u8) -> Self::Lines;

    /// Drive precomputed line values onto the bus without strobing
    fn latch(&mut self, lines: Self::Lines);

    /// Pulse the write strobe so the controller samples the data lines
    fn strobe(&mut self);

    /// Drive data/command low: the next byte is a command
    fn command_mode(&mut self);

    /// Drive data/command high: following bytes are arguments or pixels
    fn data_mode(&mut self);

    /// Assert chip select (start of a transaction)
    fn select(&mut self);

    /// Release chip select (end of a transaction)
    fn deselect(&mut self);

    /// Latch and strobe a single byte in the current mode
    fn write_byte(&mut self, byte: u8) {
        let lines = self.encode(byte);
        self.latch(lines);
        self.strobe();
    }

    /// Latch a byte as a controller command
    fn send_command(&mut self, command: u8) {
        self.command_mode();
        self.write_byte(command);
    }

    /// Latch a byte as command argument or pixel data
    fn send_data(&mut self, data: u8) {
        self.data_mode();
        self.write_byte(data);
    }

    /// Clock out one 16-bit bus word from precomputed halves (high first)
    #[inline(always)]
    fn write_word(&mut self, high: Self::Lines, low: Self::Lines) {
        self.latch(high);
        self.strobe();
        self.latch(low);
        self.strobe();
    }
}
