//! Address window protocol
//!
//! Pixel writes land in a rectangle selected by two commands: column
//! address set with the x range and page address set with the y range,
//! each as two big-endian 16-bit arguments. A memory write command then
//! restarts the pixel stream at the top-left of the new rectangle.

use shieldfill_core::{ControllerOpcodes, Orientation, Segment};
use shieldfill_hal::DisplayBus;

/// Rectangle in controller coordinates
///
/// `x2` and `y2` are sent to the controller as given. The pixel count
/// treats them as exclusive bounds, so a one-line window reports zero
/// pixels; scanline rendering therefore bounds its stream by segment
/// length rather than by the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x1: u16,
    pub x2: u16,
    pub y1: u16,
    pub y2: u16,
}

impl Window {
    /// Create a window from its column and row ranges
    pub const fn new(x1: u16, x2: u16, y1: u16, y2: u16) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// Window covering `width` x `height` pixels at (`x`, `y`)
    pub const fn rect(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self::new(x, x.saturating_add(width), y, y.saturating_add(height))
    }

    /// Window for one scanline segment
    ///
    /// Horizontal buffers vary X along the segment and Y with the line
    /// index; vertical buffers the other way round.
    pub const fn for_segment(
        orientation: Orientation,
        anchor_x: u16,
        anchor_y: u16,
        line: u16,
        segment: Segment,
    ) -> Self {
        match orientation {
            Orientation::Horizontal => {
                let x = anchor_x.wrapping_add(segment.offset);
                let y = anchor_y.wrapping_add(line);
                Self::new(x, x.wrapping_add(segment.length), y, y)
            }
            Orientation::Vertical => {
                let x = anchor_x.wrapping_add(line);
                let y = anchor_y.wrapping_add(segment.offset);
                Self::new(x, x, y, y.wrapping_add(segment.length))
            }
        }
    }

    /// `(x2 - x1) * (y2 - y1)`, zero for inverted ranges
    pub const fn pixel_count(&self) -> u32 {
        self.x2.saturating_sub(self.x1) as u32 * self.y2.saturating_sub(self.y1) as u32
    }
}

/// Point subsequent pixel writes at `window`
///
/// Sends column address set, page address set and memory write, and
/// returns the window's pixel count.
pub fn set_window<B: DisplayBus>(bus: &mut B, opcodes: &ControllerOpcodes, window: Window) -> u32 {
    bus.send_command(opcodes.column_address_set);
    send_range(bus, window.x1, window.x2);
    bus.send_command(opcodes.page_address_set);
    send_range(bus, window.y1, window.y2);
    bus.send_command(opcodes.memory_write);

    window.pixel_count()
}

fn send_range<B: DisplayBus>(bus: &mut B, start: u16, end: u16) {
    for byte in start.to_be_bytes().into_iter().chain(end.to_be_bytes()) {
        bus.send_data(byte);
    }
}
