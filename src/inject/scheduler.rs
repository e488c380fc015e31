//! Keystroke-injection scheduler.
//!
//! Turns the script into one keyboard report per tick. A tick fires once the
//! delay chosen for it has elapsed since the previous tick's slot; the slot
//! then advances by exactly that delay, so polling jitter never accumulates.
//!
//! ```text
//! Priming ──first report──▶ Running ──cursor == len──▶ Drained (idle reports)
//! ```

use super::encoder::{encode, Key};
use super::script::Script;
use super::transport::ReportTransport;
use crate::config;
use crate::hid::keyboard::modifier;
use crate::hid::KeyboardReport;

/// Emission index that carries the OS key (GUI + the script's 2nd char).
pub const CHORD_INDEX: u32 = 1;

/// Script character that types nothing and restores the default pace.
pub const FAST_RESUME: u8 = b'~';

/// Inter-report delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Before the first report.
    pub priming_ms: u64,
    /// Before the OS-key report.
    pub chord_hold_ms: u64,
    /// After a report that typed Enter.
    pub enter_settle_ms: u64,
    /// Everything else.
    pub key_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            priming_ms: config::PRIMING_DELAY_MS,
            chord_hold_ms: config::CHORD_HOLD_DELAY_MS,
            enter_settle_ms: config::ENTER_SETTLE_DELAY_MS,
            key_ms: config::KEY_DELAY_MS,
        }
    }
}

impl Timing {
    /// Delay to wait before emission `index`, given the script character the
    /// previous emission typed (`None` if it was idle or there was none).
    pub const fn delay_for(&self, index: u32, previous: Option<u8>) -> u64 {
        match (index, previous) {
            (0, _) => self.priming_ms,
            (CHORD_INDEX, _) => self.chord_hold_ms,
            (_, Some(b'\r' | b'\n')) => self.enter_settle_ms,
            (_, Some(FAST_RESUME)) => self.key_ms,
            _ => self.key_ms,
        }
    }
}

/// Scheduler phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// No report sent yet.
    Priming,
    /// Script characters remain.
    Running,
    /// Whole script sent; only idle reports from now on.
    Drained,
}

/// One report handed to the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Emission {
    /// Zero-based emission count.
    pub index: u32,
    /// Script character typed, `None` once drained.
    pub character: Option<u8>,
    pub report: KeyboardReport,
    /// Delay that gated this emission.
    pub delay_ms: u64,
}

/// Outcome of one [`InjectionScheduler::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Delay not yet elapsed.
    Waiting,
    /// Bus suspended; a remote wakeup was requested instead of sending.
    WakeupRequested,
    /// Transport still busy with the previous report; retried next poll.
    Busy,
    Emitted(Emission),
}

/// Cursor and timing state for typing one script.
pub struct InjectionScheduler<'a> {
    script: Script<'a>,
    timing: Timing,
    cursor: usize,
    emitted: u32,
    previous: Option<u8>,
    last_emit_ms: u64,
}

impl<'a> InjectionScheduler<'a> {
    /// Scheduler with the configured timing whose clock starts at `start_ms`.
    pub fn new(script: Script<'a>, start_ms: u64) -> Self {
        Self::with_timing(script, Timing::default(), start_ms)
    }

    pub fn with_timing(script: Script<'a>, timing: Timing, start_ms: u64) -> Self {
        Self {
            script,
            timing,
            cursor: 0,
            emitted: 0,
            previous: None,
            last_emit_ms: start_ms,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.emitted == 0 {
            SchedulerState::Priming
        } else if self.cursor < self.script.len() {
            SchedulerState::Running
        } else {
            SchedulerState::Drained
        }
    }

    /// Index of the next script character, in `0..=len`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of reports emitted so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    /// Start of the current tick slot.
    pub fn last_emit_ms(&self) -> u64 {
        self.last_emit_ms
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Delay gating the next emission.
    pub fn next_delay_ms(&self) -> u64 {
        self.timing.delay_for(self.emitted, self.previous)
    }

    /// Report the next emission will send.
    pub fn next_report(&self) -> KeyboardReport {
        let key = self.script.get(self.cursor).map_or(Key::NONE, encode);
        let mut bits = key.modifier;
        if self.emitted == CHORD_INDEX {
            bits |= modifier::LEFT_GUI;
        }
        KeyboardReport::single(bits, key.keycode)
    }

    /// Run one tick at time `now_ms`.
    ///
    /// Nothing changes unless the delay has elapsed and the transport takes
    /// the report.
    pub fn poll<T: ReportTransport>(&mut self, now_ms: u64, transport: &mut T) -> Tick {
        let delay_ms = self.next_delay_ms();
        if now_ms.saturating_sub(self.last_emit_ms) < delay_ms {
            return Tick::Waiting;
        }

        if transport.is_suspended() {
            transport.request_wakeup();
            return Tick::WakeupRequested;
        }

        if !transport.is_ready() {
            return Tick::Busy;
        }

        let character = self.script.get(self.cursor);
        let report = self.next_report();
        transport.submit(&report);

        let index = self.emitted;
        if character.is_some() {
            self.cursor += 1;
        }
        self.emitted = self.emitted.saturating_add(1);
        self.previous = character;
        self.last_emit_ms += delay_ms;

        Tick::Emitted(Emission {
            index,
            character,
            report,
            delay_ms,
        })
    }
}
