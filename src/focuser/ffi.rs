//! Raw bindings to FLI's libfli.
//!
//! Only the focuser subset of the API is declared. Every function returns
//! 0 on success or a negated errno value on failure.
#![allow(non_camel_case_types)]
// names follow libfli.h
#![allow(non_snake_case)]
#![allow(dead_code)]
#![allow(unsafe_code)]

use std::os::raw::{c_char, c_double, c_long};

pub type flidev_t = c_long;
pub type flidomain_t = c_long;
pub type flichannel_t = c_long;

pub const FLI_INVALID_DEVICE: flidev_t = -1;

pub const FLIDOMAIN_USB: flidomain_t = 0x02;
pub const FLIDEVICE_FOCUSER: flidomain_t = 0x300;

pub const FLI_TEMPERATURE_INTERNAL: flichannel_t = 0x00;
pub const FLI_TEMPERATURE_EXTERNAL: flichannel_t = 0x01;

/// Size of the string buffers handed to libfli.
pub const STRING_BUFFER_LEN: usize = 256;

unsafe extern "C" {
    pub fn FLIGetLibVersion(ver: *mut c_char, len: usize) -> c_long;

    pub fn FLIOpen(dev: *mut flidev_t, name: *mut c_char, domain: flidomain_t) -> c_long;
    pub fn FLIClose(dev: flidev_t) -> c_long;

    pub fn FLIGetModel(dev: flidev_t, model: *mut c_char, len: usize) -> c_long;
    pub fn FLIGetSerialString(dev: flidev_t, serial: *mut c_char, len: usize) -> c_long;
    pub fn FLIGetFWRevision(dev: flidev_t, fwrev: *mut c_long) -> c_long;
    pub fn FLIGetHWRevision(dev: flidev_t, hwrev: *mut c_long) -> c_long;

    pub fn FLIGetStepperPosition(dev: flidev_t, position: *mut c_long) -> c_long;
    pub fn FLIGetFocuserExtent(dev: flidev_t, extent: *mut c_long) -> c_long;
    pub fn FLIReadTemperature(
        dev: flidev_t,
        channel: flichannel_t,
        temperature: *mut c_double,
    ) -> c_long;

    pub fn FLIStepMotor(dev: flidev_t, steps: c_long) -> c_long;
    pub fn FLIStepMotorAsync(dev: flidev_t, steps: c_long) -> c_long;
    pub fn FLIGetStepsRemaining(dev: flidev_t, steps: *mut c_long) -> c_long;
    pub fn FLIHomeFocuser(dev: flidev_t) -> c_long;

    pub fn FLICreateList(domain: flidomain_t) -> c_long;
    pub fn FLIDeleteList() -> c_long;
    pub fn FLIListFirst(
        domain: *mut flidomain_t,
        filename: *mut c_char,
        fnlen: usize,
        name: *mut c_char,
        namelen: usize,
    ) -> c_long;
    pub fn FLIListNext(
        domain: *mut flidomain_t,
        filename: *mut c_char,
        fnlen: usize,
        name: *mut c_char,
        namelen: usize,
    ) -> c_long;
}
