//! Link state shared between the USB callbacks and the main loop.

use core::cell::Cell;

use defmt::info;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use keystroke_injector::link::{LinkEvent, LinkState};

static LINK_STATE: Mutex<CriticalSectionRawMutex, Cell<LinkState>> =
    Mutex::new(Cell::new(LinkState::Unlinked));

/// Current link state.
pub fn current() -> LinkState {
    LINK_STATE.lock(|s| s.get())
}

/// Apply a USB lifecycle or LED event.
pub fn apply(event: LinkEvent) {
    LINK_STATE.lock(|s| {
        let old = s.get();
        let new = old.on_event(event);
        if new != old {
            info!("Link: {} -> {} ({})", old, new, event);
            s.set(new);
        }
    });
}
