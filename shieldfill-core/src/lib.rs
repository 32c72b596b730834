//! Board-agnostic core for the Shieldfill display driver
//!
//! This crate holds everything that does not touch the bus:
//!
//! - Fixed-block memory pool with an intrusive free list
//! - Scanline buffers storing run-length (offset, length) segments
//! - Panel and controller configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod pool;
pub mod scanline;

pub use config::{ControllerOpcodes, PanelConfig, PanelGeometry};
pub use pool::{BlockHandle, DefaultPool, MemoryPool, PoolError, MAX_BLOCK_WORDS};
pub use scanline::{Direction, Orientation, ScanlineBuffer, ScanlineError, Segment, Segments};
