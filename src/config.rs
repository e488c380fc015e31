//! Application-wide constants and compile-time configuration.
//!
//! The injection script, its timing, the status LED blink periods and the
//! USB identity all live here so they can be tuned in one place.

// Injection script

/// Keystroke script typed into the host after enumeration.
///
/// Index 1 is sent together with the left GUI modifier, so the script opens
/// the Run dialog with `r`. A `~` types nothing: it releases the previous
/// key (needed between repeated letters) and keeps the pace at
/// [`KEY_DELAY_MS`].
pub const INJECTION_SCRIPT: &[u8] = b"~r~notepad\n~~~~hel~lo from a scripted keyboard\n";

/// Declared script length. Must not exceed `INJECTION_SCRIPT.len()`; a
/// smaller value types only a prefix.
pub const INJECTION_SCRIPT_LEN: usize = 47;

const _: () = assert!(INJECTION_SCRIPT_LEN <= INJECTION_SCRIPT.len());

// Injection timing

/// Delay before the very first report (ms).
pub const PRIMING_DELAY_MS: u64 = 700;

/// Delay before the OS-key report (ms).
pub const CHORD_HOLD_DELAY_MS: u64 = 700;

/// Delay after typing Enter, giving the host time to react (ms).
pub const ENTER_SETTLE_DELAY_MS: u64 = 250;

/// Default delay between reports (ms).
pub const KEY_DELAY_MS: u64 = 10;

/// Main loop poll interval (ms).
pub const POLL_INTERVAL_MS: u64 = 1;

// Status LED

/// Blink period while not enumerated (ms).
pub const BLINK_UNLINKED_MS: u64 = 250;

/// Blink period while configured by the host (ms).
pub const BLINK_LINKED_MS: u64 = 1000;

/// Blink period while the bus is suspended (ms).
pub const BLINK_SUSPENDED_MS: u64 = 2500;

// USB

/// Product ID layout: one bit per interface class, so a different
/// combination of interfaces never reuses a driver cached by the host.
///
/// ```text
/// [MSB]  VENDOR | MIDI | HID | MSC | CDC  [LSB]
/// ```
pub const fn product_id(cdc: bool, msc: bool, hid: bool, midi: bool, vendor: bool) -> u16 {
    0x4000
        | (cdc as u16)
        | ((msc as u16) << 1)
        | ((hid as u16) << 2)
        | ((midi as u16) << 3)
        | ((vendor as u16) << 4)
}

/// USB VID/PID. The VID is a test value; replace both for production.
pub const USB_VID: u16 = 0xCAFE;
pub const USB_PID: u16 = product_id(false, false, true, false, false);

/// Device release number (bcdDevice).
pub const USB_DEVICE_RELEASE: u16 = 0x0100;

/// USB device strings. The serial number is derived from the chip ID.
pub const USB_MANUFACTURER: &str = "keystroke-injector";
pub const USB_PRODUCT: &str = "Scripted HID Keyboard";

/// Bus power budget (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// Control endpoint packet size.
pub const USB_EP0_PACKET_SIZE: u8 = 64;

/// HID interrupt IN endpoint polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 5;

/// HID interrupt IN endpoint max packet size.
pub const USB_HID_PACKET_SIZE: u16 = 16;

// GPIO pin assignments (nRF52840-DK defaults)
//
//   Status LED → P0.13 (LED1, active-low)
