//! Board configuration
//!
//! Generated by build.rs from timer.toml.

use fstop_core::config::{DisplayKind, TimerConfig};

include!(concat!(env!("OUT_DIR"), "/timer_config.rs"));
