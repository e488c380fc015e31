//! USB serial number derived from the chip's factory device ID.

use core::fmt::Write;
use core::mem::size_of;
use heapless::String;

use crate::error::Error;

/// Hex digits in the serial string: two per byte of the two ID words.
pub const SERIAL_LEN: usize = 2 * 2 * size_of::<u32>();

/// Render the two FICR DEVICEID words as upper-case hex, high word first.
pub fn serial_number(device_id: [u32; 2]) -> Result<String<SERIAL_LEN>, Error> {
    let mut s = String::new();
    write!(s, "{:08X}{:08X}", device_id[1], device_id[0])
        .map_err(|_| Error::SerialNumber { capacity: SERIAL_LEN })?;
    Ok(s)
}
