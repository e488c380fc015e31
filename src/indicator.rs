//! Status LED blinking at a rate chosen by the link state.

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

use crate::link::LinkState;

/// Blinks an output pin with its own elapsed-time gate.
pub struct PresenceIndicator {
    state: LinkState,
    last_toggle_ms: u64,
    on: bool,
}

impl PresenceIndicator {
    /// Indicator for an unlinked device, clock starting at `start_ms`.
    pub const fn new(start_ms: u64) -> Self {
        Self {
            state: LinkState::Unlinked,
            last_toggle_ms: start_ms,
            on: false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Update the LED for time `now_ms` and the current link state.
    ///
    /// A state change restarts the period. Caps lock forces the LED on until
    /// the host clears it.
    pub fn poll<P: OutputPin>(
        &mut self,
        now_ms: u64,
        state: LinkState,
        pin: &mut P,
    ) -> Result<(), P::Error> {
        if state != self.state {
            let previous = self.state;
            self.state = state;
            self.last_toggle_ms = now_ms;
            if state == LinkState::CapslockSolid {
                self.drive(true, pin)?;
            } else if previous == LinkState::CapslockSolid {
                self.drive(false, pin)?;
            }
        }

        let Some(period) = state.blink_period_ms() else {
            return Ok(());
        };
        if now_ms.saturating_sub(self.last_toggle_ms) < period {
            return Ok(());
        }
        self.last_toggle_ms += period;
        self.drive(!self.on, pin)
    }

    fn drive<P: OutputPin>(&mut self, on: bool, pin: &mut P) -> Result<(), P::Error> {
        self.on = on;
        pin.set_state(PinState::from(on))
    }
}

/// Output pin wired active-low: `set_high` turns the LED on.
pub struct ActiveLow<P>(pub P);

impl<P: OutputPin> ErrorType for ActiveLow<P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for ActiveLow<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Default)]
    struct FakePin {
        writes: Vec<bool>,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.writes.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.writes.push(true);
            Ok(())
        }
    }

    fn run(ind: &mut PresenceIndicator, pin: &mut FakePin, state: LinkState, from: u64, to: u64) {
        for now in from..=to {
            ind.poll(now, state, pin).unwrap();
        }
    }

    #[test]
    fn toggles_once_per_period() {
        for (state, period) in [
            (LinkState::Unlinked, 250u64),
            (LinkState::Linked, 1000),
            (LinkState::Suspended, 2500),
        ] {
            let mut ind = PresenceIndicator::new(0);
            let mut pin = FakePin::default();
            // Enter the state at t=0 so the period starts there.
            ind.poll(0, state, &mut pin).unwrap();
            pin.writes.clear();

            run(&mut ind, &mut pin, state, 1, period * 4);
            assert_eq!(pin.writes, vec![true, false, true, false], "{state:?}");

            run(&mut ind, &mut pin, state, period * 4 + 1, period * 5 - 1);
            assert_eq!(pin.writes.len(), 4, "{state:?}");
        }
    }

    #[test]
    fn capslock_pins_led_on_and_stops_blinking() {
        let mut ind = PresenceIndicator::new(0);
        let mut pin = FakePin::default();

        run(&mut ind, &mut pin, LinkState::Linked, 0, 1000);
        assert_eq!(pin.writes, vec![true]);
        pin.writes.clear();

        run(&mut ind, &mut pin, LinkState::CapslockSolid, 1001, 10_000);
        assert_eq!(pin.writes, vec![true]);
        assert!(ind.is_on());
    }

    #[test]
    fn leaving_capslock_turns_led_off_and_restarts_blink() {
        let mut ind = PresenceIndicator::new(0);
        let mut pin = FakePin::default();

        run(&mut ind, &mut pin, LinkState::CapslockSolid, 0, 500);
        pin.writes.clear();

        run(&mut ind, &mut pin, LinkState::Linked, 501, 1501);
        // Off on the transition, on again one period later.
        assert_eq!(pin.writes, vec![false, true]);
    }

    #[test]
    fn late_poll_keeps_fixed_rate() {
        let mut ind = PresenceIndicator::new(0);
        let mut pin = FakePin::default();

        ind.poll(260, LinkState::Unlinked, &mut pin).unwrap();
        ind.poll(499, LinkState::Unlinked, &mut pin).unwrap();
        ind.poll(500, LinkState::Unlinked, &mut pin).unwrap();
        assert_eq!(pin.writes, vec![true, false]);
    }

    #[test]
    fn active_low_inverts_writes() {
        let mut ind = PresenceIndicator::new(0);
        let mut pin = ActiveLow(FakePin::default());

        ind.poll(0, LinkState::CapslockSolid, &mut pin).unwrap();
        assert!(ind.is_on());
        assert_eq!(pin.0.writes, vec![false]);
    }
}
