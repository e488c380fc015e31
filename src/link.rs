//! USB link state as seen by the status LED.

use crate::config;
use crate::hid::keycodes::led;

/// Connection phase plus the host's caps-lock override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Not configured by a host.
    #[default]
    Unlinked,
    /// Configured and running.
    Linked,
    /// Bus suspended by the host.
    Suspended,
    /// Host turned caps lock on: LED solid.
    CapslockSolid,
}

/// Things the USB stack tells us about the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Host selected our configuration.
    Mounted,
    /// Configuration dropped, bus reset or VBUS lost.
    Unmounted,
    Suspended,
    Resumed,
    /// Keyboard LED output report (first byte).
    KeyboardLeds(u8),
}

impl LinkState {
    /// State after `event`.
    pub const fn on_event(self, event: LinkEvent) -> LinkState {
        match event {
            LinkEvent::Mounted | LinkEvent::Resumed => LinkState::Linked,
            LinkEvent::Unmounted => LinkState::Unlinked,
            LinkEvent::Suspended => LinkState::Suspended,
            LinkEvent::KeyboardLeds(leds) if leds & led::CAPS_LOCK != 0 => {
                LinkState::CapslockSolid
            }
            LinkEvent::KeyboardLeds(_) => LinkState::Linked,
        }
    }

    /// LED toggle period, `None` when the LED is held on.
    pub const fn blink_period_ms(self) -> Option<u64> {
        match self {
            LinkState::Unlinked => Some(config::BLINK_UNLINKED_MS),
            LinkState::Linked => Some(config::BLINK_LINKED_MS),
            LinkState::Suspended => Some(config::BLINK_SUSPENDED_MS),
            LinkState::CapslockSolid => None,
        }
    }
}

/// Link event carried by a HID output report, if any.
pub fn led_report_event(data: &[u8]) -> Option<LinkEvent> {
    data.first().map(|&leds| LinkEvent::KeyboardLeds(leds))
}
