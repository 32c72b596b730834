//! Configuration types
//!
//! Panel geometry and controller opcodes. Both are supplied by the board
//! initialization layer; the renderer only forwards them to the bus.

pub mod panel;

pub use panel::{ControllerOpcodes, PanelConfig, PanelGeometry};
