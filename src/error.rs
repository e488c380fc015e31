//! Unified error type for keystroke-injector.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Script
    /// The declared script length runs past the end of the script bytes.
    ScriptLength { declared: usize, actual: usize },

    // Device identity
    /// The serial number did not fit its string buffer.
    SerialNumber { capacity: usize },

    // USB
    /// Writing a report to the HID endpoint failed.
    Usb(UsbError),
}

/// Subset of USB endpoint errors we propagate (keeps the enum `Copy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbError {
    /// The endpoint is disabled (cable unplugged or not configured).
    Disabled,
    /// The report did not fit the endpoint buffer.
    BufferOverflow,
}

// Convenience conversions

#[cfg(feature = "embedded")]
impl From<embassy_usb::driver::EndpointError> for Error {
    fn from(e: embassy_usb::driver::EndpointError) -> Self {
        match e {
            embassy_usb::driver::EndpointError::Disabled => Error::Usb(UsbError::Disabled),
            embassy_usb::driver::EndpointError::BufferOverflow => {
                Error::Usb(UsbError::BufferOverflow)
            }
        }
    }
}
