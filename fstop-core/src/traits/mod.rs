//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and the display drivers.

pub mod display;

pub use display::NumericDisplay;
