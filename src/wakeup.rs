//! Remote-wakeup request gating.
//!
//! The scheduler asks for a wakeup on every due poll while the bus is
//! suspended. The USB stack must only try once per suspend, and only if the
//! host enabled remote wakeup with SET_FEATURE(DEVICE_REMOTE_WAKEUP).

/// Tracks whether a wakeup may be signalled to the USB device task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WakeupGate {
    enabled: bool,
    suspended: bool,
    requested: bool,
}

impl WakeupGate {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            suspended: false,
            requested: false,
        }
    }

    /// Host enabled or disabled remote wakeup. Cleared on bus reset.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bus entered or left suspend. Each new suspend re-arms the gate.
    pub fn set_suspended(&mut self, suspended: bool) {
        if suspended != self.suspended {
            self.requested = false;
        }
        self.suspended = suspended;
    }

    /// Bus reset: the host must enable remote wakeup again.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Record a wakeup request; `true` if it should be signalled now.
    pub fn request(&mut self) -> bool {
        if !self.enabled || !self.suspended || self.requested {
            return false;
        }
        self.requested = true;
        true
    }
}
