//! Process architecture verification.
//!
//! The registry and the generic dispatcher run [`ensure`] before their
//! public operations, so the check fires at most once per process no matter
//! which component is touched first. A failed check terminates the process;
//! there is no error surface and no retry.

use std::sync::LazyLock;

/// Exit code used when the process fails the 64-bit check.
///
/// Kept inside the 8-bit range a Unix parent can observe, and outside the
/// conventional sysexits values.
pub const UNSUPPORTED_ARCH_EXIT_CODE: i32 = 166;

/// Whether the process runs with 64-bit native pointers.
pub fn is_64bit() -> bool {
    std::mem::size_of::<usize>() == 8
}

/// Terminate the process with [`UNSUPPORTED_ARCH_EXIT_CODE`] unless it is
/// running in a 64-bit configuration. Returns normally otherwise.
pub fn verify() {
    if !is_64bit() {
        std::process::exit(UNSUPPORTED_ARCH_EXIT_CODE);
    }
}

static VERIFIED: LazyLock<()> = LazyLock::new(verify);

/// Run [`verify`] at most once per process.
pub(crate) fn ensure() {
    LazyLock::force(&VERIFIED);
}
