// file: src/ffi.rs
// version: 1.0.0
// guid: 2a7e90b1-c45d-4f86-a3b9-e61d0c8f7254

//! C ABI for loading the crate as an external-procedure library.
//!
//! Exports `sh` and `mailx` under their unmangled names. A null or
//! non-UTF-8 argument returns -1 without running anything.

use crate::extproc;
use crate::runner::SPAWN_FAILURE_STATUS;
use libc::{c_char, c_int};
use std::ffi::CStr;
use tracing::error;

/// Borrow a C string as `&str`
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char, field: &str) -> Option<&'a str> {
    if ptr.is_null() {
        error!("{} is a null pointer", field);
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(value) => Some(value),
        Err(e) => {
            error!("{} is not valid UTF-8: {}", field, e);
            None
        }
    }
}

/// Run a command line through the configured shell
///
/// # Safety
/// `command` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn sh(command: *const c_char) -> c_int {
    match borrow_str(command, "command") {
        Some(command) => extproc::sh(command) as c_int,
        None => SPAWN_FAILURE_STATUS as c_int,
    }
}

/// Send a mail notification
///
/// # Safety
/// Every argument must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn mailx(
    to: *const c_char,
    subject: *const c_char,
    message: *const c_char,
) -> c_int {
    let args = (
        borrow_str(to, "to"),
        borrow_str(subject, "subject"),
        borrow_str(message, "message"),
    );
    match args {
        (Some(to), Some(subject), Some(message)) => {
            extproc::mailx(to, subject, message) as c_int
        }
        _ => SPAWN_FAILURE_STATUS as c_int,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn test_sh_exit_status() {
        let command = CString::new("exit 5").unwrap();
        let status = unsafe { sh(command.as_ptr()) };
        assert_eq!(status, 5);
    }

    #[test]
    fn test_sh_null_pointer() {
        let status = unsafe { sh(ptr::null()) };
        assert_eq!(status, -1);
    }

    #[test]
    fn test_sh_invalid_utf8() {
        let bytes = [0xffu8, 0xfe, 0x00];
        let status = unsafe { sh(bytes.as_ptr() as *const c_char) };
        assert_eq!(status, -1);
    }

    #[test]
    fn test_mailx_null_argument_runs_nothing() {
        let to = CString::new("alice@example.com").unwrap();
        let message = CString::new("build ok").unwrap();
        let status = unsafe { mailx(to.as_ptr(), ptr::null(), message.as_ptr()) };
        assert_eq!(status, -1);
    }
}
