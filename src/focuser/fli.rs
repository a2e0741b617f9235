//! Hardware focuser backed by libfli.
//!
//! Safe wrapper over the raw bindings in `ffi`. Every vendor call goes
//! through `check`, which turns a negated errno into a [`FocusError`].
#![allow(unsafe_code)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_long};

use tracing::{debug, info, trace, warn};

use super::FocuserOperations;
use super::ffi::{self, STRING_BUFFER_LEN, flidev_t, flidomain_t};
use super::info::{BackendKind, FocuserInfo, ListedFocuser, TemperatureChannel};
use crate::error::{FocusError, Result};

/// Domain used for every focuser: USB transport, focuser device class.
const FOCUSER_DOMAIN: flidomain_t = ffi::FLIDOMAIN_USB | ffi::FLIDEVICE_FOCUSER;

/// Open libfli focuser handle. Closed on drop.
pub struct FliFocuser {
    handle: flidev_t,
    info: FocuserInfo,
}

/// Turn a libfli return code into a `Result`.
fn check(operation: &str, code: c_long) -> Result<()> {
    if code == 0 {
        Ok(())
    } else {
        #[allow(clippy::useless_conversion)] // c_long is i32 on some targets
        let code = i64::from(code);
        warn!(operation, code, "libfli call failed");
        Err(FocusError::vendor(operation, code))
    }
}

/// Decode a NUL-terminated buffer filled in by libfli.
fn buffer_to_string(buf: &[u8]) -> String {
    CStr::from_bytes_until_nul(buf)
        .map(|s| s.to_string_lossy().trim().to_string())
        .unwrap_or_else(|_| String::from_utf8_lossy(buf).trim().to_string())
}

fn to_steps(steps: i64) -> Result<c_long> {
    c_long::try_from(steps)
        .map_err(|_| FocusError::Other(format!("Step count {steps} does not fit the device API")))
}

impl FliFocuser {
    /// Open the focuser at `device` (e.g. `/dev/fliusb0`).
    ///
    /// Needs the fliusb kernel module to be loaded.
    pub fn open(device: &str) -> Result<Self> {
        let name = CString::new(device).map_err(|_| FocusError::DeviceOpenFailed {
            device: device.to_string(),
            reason: "device path contains a NUL byte".to_string(),
        })?;

        let mut handle: flidev_t = ffi::FLI_INVALID_DEVICE;
        // SAFETY: `handle` is a valid out-pointer and `name` outlives the call.
        // libfli does not write through the name pointer.
        let code = unsafe { ffi::FLIOpen(&mut handle, name.as_ptr().cast_mut(), FOCUSER_DOMAIN) };
        if code != 0 {
            #[allow(clippy::useless_conversion)]
            let errno = i32::try_from(i64::from(code).unsigned_abs()).unwrap_or(i32::MAX);
            let reason = std::io::Error::from_raw_os_error(errno).to_string();
            warn!(device, code, %reason, "FLIOpen failed");
            return Err(FocusError::DeviceOpenFailed {
                device: device.to_string(),
                reason,
            });
        }
        info!(device, handle, "Opened FLI focuser");

        let mut focuser = Self {
            handle,
            info: FocuserInfo {
                device: device.to_string(),
                serial: "unknown".to_string(),
                firmware_revision: None,
                hardware_revision: None,
                backend: BackendKind::Libfli,
            },
        };

        // Identification is best effort; older firmware lacks a serial string.
        match focuser.read_string("querying FLI serial number", |h, buf, len| {
            // SAFETY: buffer pointer and length come from a live Vec.
            unsafe { ffi::FLIGetSerialString(h, buf, len) }
        }) {
            Ok(serial) if !serial.is_empty() => focuser.info.serial = serial,
            Ok(_) => {}
            Err(e) => debug!(error = %e, "No serial string"),
        }
        focuser.info.firmware_revision = focuser
            .read_long("querying FLI firmware revision", |h, out| {
                // SAFETY: `out` points to a live c_long.
                unsafe { ffi::FLIGetFWRevision(h, out) }
            })
            .ok();
        focuser.info.hardware_revision = focuser
            .read_long("querying FLI hardware revision", |h, out| {
                // SAFETY: `out` points to a live c_long.
                unsafe { ffi::FLIGetHWRevision(h, out) }
            })
            .ok();

        Ok(focuser)
    }

    #[allow(clippy::useless_conversion)] // c_long is i32 on some targets
    fn read_long<F>(&self, operation: &str, call: F) -> Result<i64>
    where
        F: FnOnce(flidev_t, *mut c_long) -> c_long,
    {
        let mut value: c_long = 0;
        check(operation, call(self.handle, &mut value))?;
        trace!(operation, value, "libfli read");
        Ok(i64::from(value))
    }

    fn read_string<F>(&self, operation: &str, call: F) -> Result<String>
    where
        F: FnOnce(flidev_t, *mut c_char, usize) -> c_long,
    {
        let mut buf = vec![0u8; STRING_BUFFER_LEN];
        check(
            operation,
            call(self.handle, buf.as_mut_ptr().cast::<c_char>(), buf.len()),
        )?;
        Ok(buffer_to_string(&buf))
    }
}

impl Drop for FliFocuser {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful FLIOpen and is closed once.
        let code = unsafe { ffi::FLIClose(self.handle) };
        if code != 0 {
            warn!(code, device = %self.info.device, "FLIClose failed");
        } else {
            debug!(device = %self.info.device, "Closed FLI focuser");
        }
    }
}

impl FocuserOperations for FliFocuser {
    fn info(&self) -> &FocuserInfo {
        &self.info
    }

    fn model(&self) -> Result<String> {
        self.read_string("querying FLI model", |h, buf, len| {
            // SAFETY: buffer pointer and length come from a live Vec.
            unsafe { ffi::FLIGetModel(h, buf, len) }
        })
    }

    fn position(&self) -> Result<i64> {
        self.read_long("querying FLI stepper position", |h, out| {
            // SAFETY: `out` points to a live c_long.
            unsafe { ffi::FLIGetStepperPosition(h, out) }
        })
    }

    fn extent(&self) -> Result<i64> {
        self.read_long("querying FLI maximum stepper position", |h, out| {
            // SAFETY: `out` points to a live c_long.
            unsafe { ffi::FLIGetFocuserExtent(h, out) }
        })
    }

    fn temperature(&self, channel: TemperatureChannel) -> Result<f64> {
        let (operation, channel_code) = match channel {
            TemperatureChannel::Internal => (
                "querying FLI internal temperature",
                ffi::FLI_TEMPERATURE_INTERNAL,
            ),
            TemperatureChannel::External => (
                "querying FLI external temperature",
                ffi::FLI_TEMPERATURE_EXTERNAL,
            ),
        };
        let mut value: c_double = 0.0;
        // SAFETY: `value` is a live out-pointer for the duration of the call.
        let code = unsafe { ffi::FLIReadTemperature(self.handle, channel_code, &mut value) };
        check(operation, code)?;
        Ok(value)
    }

    fn step(&self, steps: i64) -> Result<()> {
        let steps = to_steps(steps)?;
        // SAFETY: plain value arguments on an open handle.
        let code = unsafe { ffi::FLIStepMotor(self.handle, steps) };
        check("commanding FLI motor", code)
    }

    fn step_async(&self, steps: i64) -> Result<()> {
        let steps = to_steps(steps)?;
        // SAFETY: plain value arguments on an open handle.
        let code = unsafe { ffi::FLIStepMotorAsync(self.handle, steps) };
        check("commanding FLI motor", code)
    }

    fn steps_remaining(&self) -> Result<i64> {
        self.read_long("querying FLI steps remaining", |h, out| {
            // SAFETY: `out` points to a live c_long.
            unsafe { ffi::FLIGetStepsRemaining(h, out) }
        })
    }

    fn home(&self) -> Result<()> {
        // SAFETY: plain value argument on an open handle.
        let code = unsafe { ffi::FLIHomeFocuser(self.handle) };
        check("homing FLI focuser", code)
    }
}

/// Enumerate focusers in the USB focuser domain.
pub fn list_devices() -> Result<Vec<ListedFocuser>> {
    // SAFETY: value argument; the list is freed below on every path.
    check("creating FLI device list", unsafe {
        ffi::FLICreateList(FOCUSER_DOMAIN)
    })?;

    let mut devices = Vec::new();
    let mut domain: flidomain_t = 0;
    let mut file_name = vec![0u8; STRING_BUFFER_LEN];
    let mut name = vec![0u8; STRING_BUFFER_LEN];

    // SAFETY: all pointers come from live locals with matching lengths.
    let mut code = unsafe {
        ffi::FLIListFirst(
            &mut domain,
            file_name.as_mut_ptr().cast::<c_char>(),
            file_name.len(),
            name.as_mut_ptr().cast::<c_char>(),
            name.len(),
        )
    };
    while code == 0 {
        let entry = ListedFocuser {
            file_name: buffer_to_string(&file_name),
            name: buffer_to_string(&name),
        };
        trace!(?entry, domain, "Found FLI device");
        devices.push(entry);

        file_name.fill(0);
        name.fill(0);
        // SAFETY: as above.
        code = unsafe {
            ffi::FLIListNext(
                &mut domain,
                file_name.as_mut_ptr().cast::<c_char>(),
                file_name.len(),
                name.as_mut_ptr().cast::<c_char>(),
                name.len(),
            )
        };
    }

    // SAFETY: matches the FLICreateList above.
    unsafe {
        ffi::FLIDeleteList();
    }

    debug!(count = devices.len(), "Listed FLI focusers");
    Ok(devices)
}

/// Version string reported by libfli.
pub fn library_version() -> Result<String> {
    let mut buf = vec![0u8; STRING_BUFFER_LEN];
    // SAFETY: buffer pointer and length come from a live Vec.
    let code = unsafe { ffi::FLIGetLibVersion(buf.as_mut_ptr().cast::<c_char>(), buf.len()) };
    check("querying libfli version", code)?;
    Ok(buffer_to_string(&buf))
}
