//! HID class layer for the boot keyboard interface.
//!
//! Interface triple, the class descriptor that points the host at the report
//! descriptor, and the class-specific control requests. The embassy-side
//! handler in the firmware filters requests addressed to our interface and
//! forwards them here.

use crate::link::{led_report_event, LinkEvent};

/// USB interface class: HID.
pub const USB_CLASS_HID: u8 = 0x03;
/// HID interface subclass: boot interface.
pub const SUBCLASS_BOOT: u8 = 0x01;
/// HID interface protocol: keyboard.
pub const PROTOCOL_KEYBOARD: u8 = 0x01;

/// (class, subclass, protocol) of the keyboard interface.
pub const KEYBOARD_INTERFACE: (u8, u8, u8) = (USB_CLASS_HID, SUBCLASS_BOOT, PROTOCOL_KEYBOARD);

/// Descriptor type of the HID class descriptor.
pub const DESC_TYPE_HID: u8 = 0x21;
/// Descriptor type of the report descriptor.
pub const DESC_TYPE_REPORT: u8 = 0x22;

/// Full length of the HID class descriptor.
pub const HID_DESCRIPTOR_LEN: usize = 9;

/// bcdHID 1.11
const HID_VERSION: [u8; 2] = [0x11, 0x01];

/// Class-specific request codes (bRequest).
pub mod request {
    pub const GET_REPORT: u8 = 0x01;
    pub const GET_IDLE: u8 = 0x02;
    pub const GET_PROTOCOL: u8 = 0x03;
    pub const SET_REPORT: u8 = 0x09;
    pub const SET_IDLE: u8 = 0x0A;
    pub const SET_PROTOCOL: u8 = 0x0B;
}

/// Report type carried in the high byte of wValue for GET/SET_REPORT.
const REPORT_TYPE_OUTPUT: u8 = 0x02;

/// HID class descriptor body, without the bLength/bDescriptorType header.
pub const fn hid_descriptor_body(report_len: usize) -> [u8; HID_DESCRIPTOR_LEN - 2] {
    [
        HID_VERSION[0],
        HID_VERSION[1],
        0x00, // country code: not localised
        0x01, // one class descriptor follows
        DESC_TYPE_REPORT,
        (report_len & 0xFF) as u8,
        ((report_len >> 8) & 0xFF) as u8,
    ]
}

/// Complete HID class descriptor, as returned for GET_DESCRIPTOR(HID).
pub const fn hid_descriptor(report_len: usize) -> [u8; HID_DESCRIPTOR_LEN] {
    let body = hid_descriptor_body(report_len);
    [
        HID_DESCRIPTOR_LEN as u8,
        DESC_TYPE_HID,
        body[0],
        body[1],
        body[2],
        body[3],
        body[4],
        body[5],
        body[6],
    ]
}

/// Protocol selected by SET_PROTOCOL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    Boot = 0,
    #[default]
    Report = 1,
}

impl Protocol {
    pub const fn from_wvalue(value: u16) -> Option<Self> {
        match value {
            0 => Some(Protocol::Boot),
            1 => Some(Protocol::Report),
            _ => None,
        }
    }
}

/// Outcome of a host-to-device class request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutOutcome {
    /// Accepted; the payload may carry a link event (LED output report).
    Accepted(Option<LinkEvent>),
    Rejected,
}

/// Class request state of the keyboard interface.
///
/// The report layout is the boot layout in both protocols, so the selected
/// protocol is only stored and reported back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardClass {
    protocol: Protocol,
    /// Idle rate in 4 ms units; 0 means report only on change.
    idle_rate: u8,
}

impl KeyboardClass {
    pub const fn new() -> Self {
        Self {
            protocol: Protocol::Report,
            idle_rate: 0,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn idle_rate(&self) -> u8 {
        self.idle_rate
    }

    /// Bus reset puts the interface back into report protocol.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Handle a class OUT request (`bRequest`, `wValue`, data stage).
    pub fn control_out(&mut self, req: u8, value: u16, data: &[u8]) -> OutOutcome {
        match req {
            request::SET_PROTOCOL => match Protocol::from_wvalue(value) {
                Some(protocol) => {
                    self.protocol = protocol;
                    OutOutcome::Accepted(None)
                }
                None => OutOutcome::Rejected,
            },
            request::SET_IDLE => {
                self.idle_rate = (value >> 8) as u8;
                OutOutcome::Accepted(None)
            }
            request::SET_REPORT if (value >> 8) as u8 == REPORT_TYPE_OUTPUT => {
                OutOutcome::Accepted(led_report_event(data))
            }
            _ => OutOutcome::Rejected,
        }
    }

    /// Handle a class IN request; returns the number of bytes written to
    /// `buf`, or `None` to stall. GET_REPORT is not supported.
    pub fn control_in(&self, req: u8, buf: &mut [u8]) -> Option<usize> {
        let byte = match req {
            request::GET_PROTOCOL => self.protocol as u8,
            request::GET_IDLE => self.idle_rate,
            _ => return None,
        };
        let slot = buf.first_mut()?;
        *slot = byte;
        Some(1)
    }
}
