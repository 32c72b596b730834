//! Parallel bus drivers

pub mod gpio;
pub mod shield;

pub use gpio::GpioBus;
pub use shield::{ShieldBus, ShieldLines};
