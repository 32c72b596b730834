//! Scanline rendering for parallel-bus display controllers
//!
//! This crate provides:
//! - `Window` and `set_window` for the column/page address protocol
//! - `Color` and `PixelPattern` for once-per-call color precompute
//! - `ScanlineRenderer` for streaming scanline buffers and solid fills
//!
//! # Architecture
//!
//! The renderer owns a [`DisplayBus`](shieldfill_hal::DisplayBus) and an
//! [`InterruptMask`](shieldfill_hal::InterruptMask). Every operation that
//! sends more than one word runs as a single masked transaction: chip
//! select, address window, then the pixel stream. Raw command and data
//! sends are passed through unmasked.

#![no_std]

pub mod color;
pub mod renderer;
pub mod window;

#[cfg(test)]
mod mock;

// Re-export key types
pub use color::{Color, PixelPattern};
pub use renderer::ScanlineRenderer;
pub use window::{set_window, Window};
