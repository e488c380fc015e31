//! HID boot keyboard report types, usage codes, the report descriptor and
//! the class requests of the keyboard interface.

pub mod class;
pub mod keyboard;
pub mod keycodes;


pub use class::{KeyboardClass, KEYBOARD_INTERFACE};
pub use keyboard::{KeyboardReport, KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
