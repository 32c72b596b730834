//! Panel configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default panel width in pixels (portrait)
pub const DEFAULT_WIDTH: u16 = 240;

/// Default panel height in pixels (portrait)
pub const DEFAULT_HEIGHT: u16 = 320;

/// Panel dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
}

impl PanelGeometry {
    /// Create a new geometry
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total pixels on the surface
    pub const fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Controller command bytes used by the renderer
///
/// Defaults follow the MIPI DCS numbering shared by ILI9341-class
/// controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerOpcodes {
    /// Column address set (x range)
    pub column_address_set: u8,
    /// Page address set (y range)
    pub page_address_set: u8,
    /// Memory write (begin pixel stream)
    pub memory_write: u8,
}

impl ControllerOpcodes {
    /// ILI9341 / MIPI DCS opcodes
    pub const DCS: Self = Self {
        column_address_set: 0x2A,
        page_address_set: 0x2B,
        memory_write: 0x2C,
    };
}

impl Default for ControllerOpcodes {
    fn default() -> Self {
        Self::DCS
    }
}

/// Everything the renderer needs to know about the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub geometry: PanelGeometry,
    pub opcodes: ControllerOpcodes,
}

impl PanelConfig {
    /// Create a config from geometry and opcodes
    pub const fn new(geometry: PanelGeometry, opcodes: ControllerOpcodes) -> Self {
        Self { geometry, opcodes }
    }
}
