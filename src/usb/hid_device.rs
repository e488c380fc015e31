//! USB HID keyboard device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and registers one HID boot keyboard interface (class 3,
//! subclass 1, protocol 1) with a single interrupt IN endpoint.

use crate::usb::{link, transport};
use defmt::{debug, info, warn};
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::control::{InResponse, OutResponse, Recipient, Request, RequestType};
use embassy_usb::driver::{Endpoint as _, EndpointIn as _};
use embassy_usb::types::InterfaceNumber;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use heapless::String;
use keystroke_injector::device_id::{self, SERIAL_LEN};
use keystroke_injector::hid::class::{
    self, hid_descriptor, hid_descriptor_body, OutOutcome, DESC_TYPE_HID, DESC_TYPE_REPORT,
    HID_DESCRIPTOR_LEN,
};
use keystroke_injector::hid::{KeyboardClass, KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use keystroke_injector::link::LinkEvent;
use keystroke_injector::{config, Error};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
/// Interrupt IN endpoint carrying keyboard reports.
pub type KeyboardEndpoint = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;

static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static USB_SERIAL: StaticCell<String<SERIAL_LEN>> = StaticCell::new();
static DEVICE_HANDLER: StaticCell<DeviceHandler> = StaticCell::new();
static KB_CONTROL: StaticCell<KeyboardControl> = StaticCell::new();

/// Maps bus lifecycle callbacks to transport flags and link events.
struct DeviceHandler;

impl Handler for DeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            transport::reset();
            link::apply(LinkEvent::Unmounted);
        }
    }

    fn reset(&mut self) {
        transport::reset();
        link::apply(LinkEvent::Unmounted);
    }

    fn configured(&mut self, configured: bool) {
        transport::set_configured(configured);
        link::apply(if configured {
            LinkEvent::Mounted
        } else {
            LinkEvent::Unmounted
        });
    }

    fn suspended(&mut self, suspended: bool) {
        transport::set_suspended(suspended);
        let event = match (suspended, transport::is_configured()) {
            (true, _) => LinkEvent::Suspended,
            (false, true) => LinkEvent::Resumed,
            (false, false) => LinkEvent::Unmounted,
        };
        link::apply(event);
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        info!("USB remote wakeup {}", if enabled { "enabled" } else { "disabled" });
        transport::set_remote_wakeup_enabled(enabled);
    }
}

/// Control requests addressed to the keyboard interface: the HID and
/// report descriptors, and the class requests handled by [`KeyboardClass`].
struct KeyboardControl {
    if_num: InterfaceNumber,
    hid_descriptor: [u8; HID_DESCRIPTOR_LEN],
    class: KeyboardClass,
}

impl KeyboardControl {
    fn addressed_to_us(&self, req: &Request) -> bool {
        req.recipient == Recipient::Interface && req.index == u16::from(self.if_num.0)
    }
}

impl Handler for KeyboardControl {
    fn reset(&mut self) {
        self.class.reset();
    }

    fn control_out(&mut self, req: Request, data: &[u8]) -> Option<OutResponse> {
        if !self.addressed_to_us(&req) || req.request_type != RequestType::Class {
            return None;
        }
        match self.class.control_out(req.request, req.value, data) {
            OutOutcome::Accepted(event) => {
                if let Some(event) = event {
                    link::apply(event);
                }
                Some(OutResponse::Accepted)
            }
            OutOutcome::Rejected => {
                debug!("HID class request {=u8:#x} rejected", req.request);
                Some(OutResponse::Rejected)
            }
        }
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        if !self.addressed_to_us(&req) {
            return None;
        }
        match req.request_type {
            RequestType::Standard if req.request == Request::GET_DESCRIPTOR => {
                match (req.value >> 8) as u8 {
                    DESC_TYPE_REPORT => Some(InResponse::Accepted(KEYBOARD_REPORT_DESCRIPTOR)),
                    DESC_TYPE_HID => Some(InResponse::Accepted(&self.hid_descriptor)),
                    _ => Some(InResponse::Rejected),
                }
            }
            RequestType::Class => match self.class.control_in(req.request, buf) {
                Some(n) => Some(InResponse::Accepted(&buf[..n])),
                // GET_REPORT lands here; the stack stalls the request.
                None => Some(InResponse::Rejected),
            },
            _ => None,
        }
    }
}

/// Build result containing the USB device runner and the keyboard endpoint.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_endpoint: KeyboardEndpoint,
}

/// Initialise the USB stack and create the HID keyboard.
///
/// Must be called exactly once. All static buffers are consumed here.
/// `device_id` is the chip's FICR DEVICEID, used for the serial number.
pub fn init(usbd: peripherals::USBD, device_id: [u32; 2]) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let serial = match device_id::serial_number(device_id) {
        Ok(serial) => serial,
        Err(e) => {
            warn!("No USB serial number: {}", e);
            String::new()
        }
    };
    let serial: &'static String<SERIAL_LEN> = USB_SERIAL.init(serial);

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = (!serial.is_empty()).then_some(serial.as_str());
    usb_config.device_release = config::USB_DEVICE_RELEASE;
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = config::USB_EP0_PACKET_SIZE;
    usb_config.supports_remote_wakeup = true;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(DEVICE_HANDLER.init(DeviceHandler));

    // Boot keyboard interface: HID class descriptor + one interrupt IN endpoint.
    let (if_class, if_subclass, if_protocol) = class::KEYBOARD_INTERFACE;
    let report_len = KEYBOARD_REPORT_DESCRIPTOR.len();
    let mut func = builder.function(if_class, if_subclass, if_protocol);
    let mut iface = func.interface();
    let if_num = iface.interface_number();
    let mut alt = iface.alt_setting(if_class, if_subclass, if_protocol, None);
    alt.descriptor(DESC_TYPE_HID, &hid_descriptor_body(report_len));
    let keyboard_endpoint =
        alt.endpoint_interrupt_in(config::USB_HID_PACKET_SIZE, config::USB_HID_POLL_MS);
    drop(func);

    builder.handler(KB_CONTROL.init(KeyboardControl {
        if_num,
        hid_descriptor: hid_descriptor(report_len),
        class: KeyboardClass::new(),
    }));

    let device = builder.build();

    info!(
        "USB HID keyboard initialised ({=u16:#x}:{=u16:#x}, serial {})",
        config::USB_VID,
        config::USB_PID,
        serial.as_str()
    );

    UsbHidDevice {
        device,
        keyboard_endpoint,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// Handles enumeration and endpoint servicing. While the bus is suspended
/// it waits for either the host to resume or the scheduler to ask for a
/// remote wakeup.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    loop {
        device.run_until_suspend().await;
        match select(device.wait_resume(), transport::wakeup_signal().wait()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("USB remote wakeup");
                if device.remote_wakeup().await.is_err() {
                    warn!("USB remote wakeup refused by host");
                }
            }
        }
    }
}

/// HID report task - writes each submitted report to the keyboard
/// endpoint, then marks the transport ready for the next one.
pub async fn hid_writer_task(mut endpoint: KeyboardEndpoint) -> ! {
    info!("HID writer task started - waiting for reports");

    let reports = transport::report_receiver();
    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];

    loop {
        let report = reports.receive().await;
        let n = report.serialize(&mut buf);
        if let Err(e) = endpoint.write(&buf[..n]).await.map_err(Error::from) {
            warn!("USB keyboard write failed: {}", e);
            endpoint.wait_enabled().await;
        }
        transport::report_complete();
    }
}
