//! Host-testable library for keystroke-injector.
//!
//! Everything that does not touch hardware lives here: the HID report
//! format, the character encoder, the injection scheduler, link state and
//! the status LED logic. The firmware in `main.rs` wires these to the
//! embassy USB stack.
//!
//! Usage: `cargo test` on the host.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with `--features embedded`.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod device_id;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod inject;
pub mod link;
pub mod wakeup;

pub use error::Error;
