//! keystroke-injector firmware for the nRF52840.
//!
//! Enumerates as a USB boot keyboard and, once the host has configured it,
//! types the configured script. The main loop polls the injection
//! scheduler and the status LED; the USB stack and the HID endpoint writer
//! run as separate tasks on the same executor.

#![no_std]
#![no_main]

mod usb;

use defmt::{debug, error, info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::pac;
use embassy_time::{Duration, Instant, Timer};
use embassy_usb::UsbDevice;
use keystroke_injector::config;
use keystroke_injector::indicator::{ActiveLow, PresenceIndicator};
use keystroke_injector::inject::{InjectionScheduler, SchedulerState, Script, Tick};
use keystroke_injector::link::LinkState;
use usb::hid_device::{self, KeyboardEndpoint, UsbDriver};
use usb::transport::UsbTransport;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_writer_task(endpoint: KeyboardEndpoint) -> ! {
    hid_device::hid_writer_task(endpoint).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("keystroke-injector starting");

    // USBD needs the external high-frequency crystal.
    pac::CLOCK.tasks_hfclkstart().write_value(1);
    while pac::CLOCK.events_hfclkstarted().read() != 1 {}

    let device_id = [pac::FICR.deviceid(0).read(), pac::FICR.deviceid(1).read()];
    let usb = hid_device::init(p.USBD, device_id);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(hid_writer_task(usb.keyboard_endpoint)));

    let script =
        match Script::with_declared_len(config::INJECTION_SCRIPT, config::INJECTION_SCRIPT_LEN) {
            Ok(script) => script,
            Err(e) => {
                error!("Script length rejected: {}", e);
                Script::new(config::INJECTION_SCRIPT)
            }
        };

    // LED1 on the DK is active-low.
    let mut led = ActiveLow(Output::new(p.P0_13, Level::High, OutputDrive::Standard));
    let mut indicator = PresenceIndicator::new(Instant::now().as_millis());
    let mut transport = UsbTransport;
    let mut scheduler: Option<InjectionScheduler<'static>> = None;
    let mut drained = false;

    loop {
        let now = Instant::now().as_millis();
        let link = usb::link::current();

        // The tick base starts at enumeration, not at power-on.
        if scheduler.is_none() && link != LinkState::Unlinked {
            info!("Host linked - typing {} bytes", script.len());
            scheduler = Some(InjectionScheduler::new(script, now));
        }

        if let Some(s) = scheduler.as_mut() {
            match s.poll(now, &mut transport) {
                Tick::Emitted(e) => {
                    debug!("Report {}: {} after {} ms", e.index, e.report, e.delay_ms)
                }
                Tick::WakeupRequested => debug!("Bus suspended - wakeup requested"),
                Tick::Waiting | Tick::Busy => {}
            }
            if !drained && s.state() == SchedulerState::Drained {
                drained = true;
                info!("Script complete after {} reports", s.emitted());
            }
        }

        match indicator.poll(now, link, &mut led) {
            Ok(()) => {}
            Err(e) => match e {},
        }

        Timer::after(Duration::from_millis(config::POLL_INTERVAL_MS)).await;
    }
}
