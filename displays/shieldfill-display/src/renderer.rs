//! Scanline renderer
//!
//! Streams scanline buffers and solid fills to the controller. Each
//! multi-word operation is one transaction run with interrupts masked:
//!
//! ```text
//! mask ─► select ─► memory write ─► [window ─► data mode ─► pixels]* ─► deselect ─► unmask
//! ```
//!
//! The color is encoded into bus line values once per call, before the
//! pixel loop, so the loop itself only latches and strobes.

use shieldfill_core::{Direction, PanelConfig, ScanlineBuffer, ScanlineError};
use shieldfill_hal::{DisplayBus, InterruptMask};

use crate::color::{Color, PixelPattern};
use crate::window::{set_window, Window};

/// Renderer for one display controller
pub struct ScanlineRenderer<B, M> {
    bus: B,
    mask: M,
    config: PanelConfig,
}

impl<B, M> ScanlineRenderer<B, M>
where
    B: DisplayBus,
    M: InterruptMask,
{
    /// Create a renderer over an already initialized controller
    pub fn new(bus: B, mask: M, config: PanelConfig) -> Self {
        Self { bus, mask, config }
    }

    /// Panel configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Borrow the bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Give the bus and mask back
    pub fn release(self) -> (B, M) {
        (self.bus, self.mask)
    }

    /// Send a single command byte
    ///
    /// Not masked: a lone byte cannot be torn by an interrupt.
    pub fn send_command(&mut self, command: u8) {
        self.bus.send_command(command);
    }

    /// Send a single data byte
    pub fn send_data(&mut self, data: u8) {
        self.bus.send_data(data);
    }

    /// Blank the whole surface
    ///
    /// Color zero needs no pattern: the data lines are zeroed once and
    /// only the strobe is toggled, twice per pixel.
    pub fn clear(&mut self) {
        let Self { bus, mask, config } = self;
        let surface = surface_window(config);
        let pixels = config.geometry.pixel_count();

        mask.free(|| {
            bus.select();
            bus.send_command(config.opcodes.memory_write);
            set_window(bus, &config.opcodes, surface);

            let zero = bus.encode(0);
            bus.latch(zero);
            bus.data_mode();
            for _ in 0..pixels {
                bus.strobe();
                bus.strobe();
            }
            bus.deselect();
        });
    }

    /// Fill the whole surface with `color`
    pub fn fill_screen(&mut self, color: Color) {
        let Self { bus, mask, config } = self;
        let surface = surface_window(config);
        let pixels = config.geometry.pixel_count();

        mask.free(|| {
            let pattern = PixelPattern::new(&*bus, color);
            bus.select();
            bus.send_command(config.opcodes.memory_write);
            set_window(bus, &config.opcodes, surface);
            bus.data_mode();
            pattern.emit_n(bus, pixels);
            bus.deselect();
        });
    }

    /// Fill a `width` x `length` rectangle with its corner at (`x`, `y`)
    ///
    /// Returns the number of pixels streamed.
    pub fn draw_rectangle_filled(&mut self, x: u16, y: u16, length: u16, width: u16, color: Color) -> u32 {
        let Self { bus, mask, config } = self;
        let window = Window::rect(x, y, width, length);

        mask.free(|| {
            let pattern = PixelPattern::new(&*bus, color);
            bus.select();
            bus.send_command(config.opcodes.memory_write);
            let pixels = set_window(bus, &config.opcodes, window);
            bus.data_mode();
            pattern.emit_n(bus, pixels);
            bus.deselect();
            pixels
        })
    }

    /// Fill a `side` x `side` square with its corner at (`x`, `y`)
    pub fn draw_square_filled(&mut self, x: u16, y: u16, side: u16, color: Color) -> u32 {
        self.draw_rectangle_filled(x, y, side, side, color)
    }

    /// Stream every segment of `scan` as a solid run of `color`
    ///
    /// Segment `i` (in storage order) lands on line `i` going forward, or
    /// on line `count - 1 - i` in reverse, relative to (`start_x`,
    /// `start_y`). Returns the number of pixels streamed, or
    /// [`ScanlineError::PoolExhausted`] without touching the bus when the
    /// buffer never got a block.
    pub fn draw_scanline<const BLOCKS: usize, const WORDS: usize>(
        &mut self,
        scan: &ScanlineBuffer<'_, BLOCKS, WORDS>,
        start_x: u16,
        start_y: u16,
        color: Color,
        direction: Direction,
    ) -> Result<u32, ScanlineError> {
        if !scan.is_allocated() {
            #[cfg(feature = "defmt")]
            defmt::warn!("draw_scanline on unowned buffer skipped");
            return Err(ScanlineError::PoolExhausted);
        }

        let Self { bus, mask, config } = self;
        let orientation = scan.orientation();
        let segments = scan.segments();
        let count = segments.len();

        let streamed = mask.free(|| {
            let pattern = PixelPattern::new(&*bus, color);
            let mut streamed = 0u32;

            bus.select();
            bus.send_command(config.opcodes.memory_write);

            for (i, segment) in segments.enumerate() {
                let line = match direction {
                    Direction::Forward => i,
                    Direction::Reverse => count - 1 - i,
                };
                // Block size is capped so every line index fits a word
                let line = line as u16;
                let window = Window::for_segment(orientation, start_x, start_y, line, segment);

                set_window(bus, &config.opcodes, window);
                bus.data_mode();
                pattern.emit_n(bus, u32::from(segment.length));
                streamed += u32::from(segment.length);
            }

            bus.deselect();
            streamed
        });

        Ok(streamed)
    }

    /// Stream `scan` at its own origin
    pub fn draw_anchored<const BLOCKS: usize, const WORDS: usize>(
        &mut self,
        scan: &ScanlineBuffer<'_, BLOCKS, WORDS>,
        color: Color,
        direction: Direction,
    ) -> Result<u32, ScanlineError> {
        let (x, y) = scan.origin();
        self.draw_scanline(scan, x, y, color, direction)
    }
}

fn surface_window(config: &PanelConfig) -> Window {
    Window::rect(0, 0, config.geometry.width, config.geometry.height)
}
