//! Client identifier sent with every exchange.

/// Library name used in the client identifier.
pub const LIBRARY_NAME: &str = "librequests";

/// `"<library>/<version> <kernel-name>/<kernel-release>"`.
pub fn user_agent() -> String {
    let (kernel, release) = kernel_identity();
    format!(
        "{LIBRARY_NAME}/{} {kernel}/{release}",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(unix)]
fn kernel_identity() -> (String, String) {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let mut name = MaybeUninit::<libc::utsname>::zeroed();
    // SAFETY: uname only writes into the struct we pass.
    let rc = unsafe { libc::uname(name.as_mut_ptr()) };
    if rc != 0 {
        return fallback_identity();
    }
    // SAFETY: uname succeeded, so every field holds a NUL-terminated string.
    let name = unsafe { name.assume_init() };
    let sysname = unsafe { CStr::from_ptr(name.sysname.as_ptr()) };
    let release = unsafe { CStr::from_ptr(name.release.as_ptr()) };
    (
        sysname.to_string_lossy().into_owned(),
        release.to_string_lossy().into_owned(),
    )
}

#[cfg(not(unix))]
fn kernel_identity() -> (String, String) {
    fallback_identity()
}

fn fallback_identity() -> (String, String) {
    (std::env::consts::OS.to_string(), "unknown".to_string())
}
