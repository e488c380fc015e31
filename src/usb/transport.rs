//! Scheduler transport backed by the HID writer task.
//!
//! `submit` hands the report to the writer task through a one-slot channel
//! and marks it in flight; the writer clears the flag once the endpoint
//! write completes. Readiness is therefore "configured, awake, and the
//! previous report has been sent". Wakeup requests pass through a
//! [`WakeupGate`] so the device task sees at most one per suspend.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_sync::signal::Signal;
use keystroke_injector::hid::KeyboardReport;
use keystroke_injector::inject::ReportTransport;
use keystroke_injector::wakeup::WakeupGate;

static REPORTS: Channel<CriticalSectionRawMutex, KeyboardReport, 1> = Channel::new();
static IN_FLIGHT: AtomicBool = AtomicBool::new(false);
static CONFIGURED: AtomicBool = AtomicBool::new(false);
static SUSPENDED: AtomicBool = AtomicBool::new(false);
static WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
static WAKEUP_GATE: Mutex<CriticalSectionRawMutex, RefCell<WakeupGate>> =
    Mutex::new(RefCell::new(WakeupGate::new()));

pub fn set_configured(configured: bool) {
    CONFIGURED.store(configured, Ordering::Release);
}

pub fn is_configured() -> bool {
    CONFIGURED.load(Ordering::Acquire)
}

pub fn set_suspended(suspended: bool) {
    SUSPENDED.store(suspended, Ordering::Release);
    WAKEUP_GATE.lock(|g| g.borrow_mut().set_suspended(suspended));
}

/// Host enabled or disabled remote wakeup.
pub fn set_remote_wakeup_enabled(enabled: bool) {
    WAKEUP_GATE.lock(|g| g.borrow_mut().set_enabled(enabled));
}

/// Bus reset: drop every flag the host set.
pub fn reset() {
    CONFIGURED.store(false, Ordering::Release);
    SUSPENDED.store(false, Ordering::Release);
    WAKEUP_GATE.lock(|g| g.borrow_mut().reset());
}

/// Reports waiting for the HID endpoint.
pub fn report_receiver() -> Receiver<'static, CriticalSectionRawMutex, KeyboardReport, 1> {
    REPORTS.receiver()
}

/// Called by the writer task when a report has left the endpoint.
pub fn report_complete() {
    IN_FLIGHT.store(false, Ordering::Release);
}

/// Remote wakeup requests, consumed by the USB device task.
pub fn wakeup_signal() -> &'static Signal<CriticalSectionRawMutex, ()> {
    &WAKEUP
}

/// Handle the scheduler submits through. All state is in the statics above.
pub struct UsbTransport;

impl ReportTransport for UsbTransport {
    fn is_ready(&self) -> bool {
        is_configured()
            && !SUSPENDED.load(Ordering::Acquire)
            && !IN_FLIGHT.load(Ordering::Acquire)
    }

    fn submit(&mut self, report: &KeyboardReport) {
        if !self.is_ready() {
            return;
        }
        IN_FLIGHT.store(true, Ordering::Release);
        if REPORTS.try_send(*report).is_err() {
            IN_FLIGHT.store(false, Ordering::Release);
        }
    }

    fn is_suspended(&self) -> bool {
        SUSPENDED.load(Ordering::Acquire)
    }

    fn request_wakeup(&mut self) {
        if WAKEUP_GATE.lock(|g| g.borrow_mut().request()) {
            WAKEUP.signal(());
        }
    }
}
