//! Shieldfill Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display core is written
//! against. Chip- or board-specific crates implement them so the same
//! scanline renderer can drive different wiring.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  shieldfill-display (renderer)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  shieldfill-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  ShieldBus    │       │   GpioBus     │
//! │ (split ports) │       │ (8 pins)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::DisplayBus`] - Command/data byte transport to the controller
//! - [`port::PortRegister`] - 8-bit memory-mapped I/O port
//! - [`irq::InterruptMask`] - Scoped suppression of asynchronous interrupts

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod irq;
pub mod port;

// Re-export key traits at crate root for convenience
pub use bus::DisplayBus;
pub use irq::{CriticalSectionMask, InterruptMask};
pub use port::PortRegister;
