//! USB Device subsystem - presents a boot keyboard to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. A single HID interface carries the keyboard IN reports
//! and receives the host's LED output report over the control pipe.
//!
//! - `hid_device`: stack setup, the device task and the HID writer task
//! - `transport`: the scheduler's view of the HID endpoint
//! - `link`: link state shared with the status LED

pub mod hid_device;
pub mod link;
pub mod transport;
