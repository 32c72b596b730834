//! Display bus implementations
//!
//! This crate provides concrete implementations of the
//! [`DisplayBus`](shieldfill_hal::DisplayBus) trait:
//!
//! - Split-port shield bus (data lines scattered over three 8-bit ports)
//! - GPIO bus (eight `embedded-hal` output pins plus control pins)

#![no_std]
#![deny(unsafe_code)]

pub mod bus;

pub use bus::{GpioBus, ShieldBus, ShieldLines};
