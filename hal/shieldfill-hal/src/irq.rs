//! Interrupt suppression
//!
//! Multi-word bus transactions (window setup followed by pixel streaming)
//! must not be split by an interrupt handler that also touches the bus.
//! Operations that issue more than one word run inside
//! [`InterruptMask::free`]; single-byte sends do not.

/// Scoped suppression of asynchronous interrupts
///
/// Interrupts are disabled for the duration of `f` and restored to their
/// previous state afterwards, including when `f` unwinds.
pub trait InterruptMask {
    /// Run `f` with interrupts suppressed
    fn free<R>(&mut self, f: impl FnOnce() -> R) -> R;
}

/// Interrupt mask backed by the `critical-section` crate
///
/// The platform provides the actual implementation (for example
/// `cortex-m`'s `critical-section-single-core` or an AVR
/// `interrupt::free` shim).
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CriticalSectionMask;

impl CriticalSectionMask {
    /// Create a new critical-section mask
    pub const fn new() -> Self {
        Self
    }
}

impl InterruptMask for CriticalSectionMask {
    fn free<R>(&mut self, f: impl FnOnce() -> R) -> R {
        critical_section::with(|_| f())
    }
}
