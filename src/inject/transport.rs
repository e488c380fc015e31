//! Report submission capability consumed by the scheduler.

use crate::hid::KeyboardReport;

/// A HID keyboard IN channel.
///
/// Completion of a submitted report is tracked by the implementation and
/// only observed through [`is_ready`](ReportTransport::is_ready).
pub trait ReportTransport {
    /// `true` when a new report can be submitted.
    fn is_ready(&self) -> bool;

    /// Queue one report. Does nothing if the transport is not ready.
    fn submit(&mut self, report: &KeyboardReport);

    /// `true` while the bus is suspended by the host.
    fn is_suspended(&self) -> bool;

    /// Ask the host to resume the bus (USB remote wakeup).
    fn request_wakeup(&mut self);
}

impl<T: ReportTransport + ?Sized> ReportTransport for &mut T {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn submit(&mut self, report: &KeyboardReport) {
        (**self).submit(report)
    }

    fn is_suspended(&self) -> bool {
        (**self).is_suspended()
    }

    fn request_wakeup(&mut self) {
        (**self).request_wakeup()
    }
}
