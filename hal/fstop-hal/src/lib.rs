//! fstop Hardware Abstraction Layer
//!
//! This crate defines the hardware boundary of the display drivers. Chip
//! specific crates (RP2040, or a test harness on the host) implement these
//! traits; the drivers in `fstop-drivers` only ever talk to them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fstop-drivers (TM1637, MAX7219)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fstop-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  fstop-hal-   │       │  host mocks   │
//! │    rp2040     │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`binding::PlatformBinding`] - Two-wire bus capabilities (clock + data)
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiWrite`] - Write-only shift output

#![no_std]
#![deny(unsafe_code)]

pub mod binding;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use binding::PlatformBinding;
pub use gpio::{InputPin, OutputPin};
pub use spi::{SpiConfig, SpiWrite};
