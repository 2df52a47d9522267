// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Interrupt flag for SIGINT and SIGTERM.
//
// The handler stores `true` into a static atomic and returns. No I/O, no
// allocation, no locks: an atomic store is async-signal-safe. The paint
// loop swaps the flag back to `false` once per iteration and runs the save
// sequence on the main path.
//
// SA_RESTART is deliberately left off so a `poll` in progress returns EINTR
// and the loop notices the flag without waiting out its timeout.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the SIGINT and SIGTERM handlers.
///
/// Calling it more than once is harmless.
pub fn install() {
    for sig in [libc::SIGINT, libc::SIGTERM] {
        unsafe {
            let mut sa: libc::sigaction = std::mem::zeroed();
            sa.sa_sigaction = interrupt_handler as *const () as usize;
            sa.sa_flags = 0;
            libc::sigemptyset(&raw mut sa.sa_mask);
            libc::sigaction(sig, &raw const sa, std::ptr::null_mut());
        }
    }
    tracing::debug!("interrupt handlers installed");
}

extern "C" fn interrupt_handler(_sig: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// The flag the handlers set.
#[must_use]
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_sets_flag() {
        flag().store(false, Ordering::Relaxed);
        interrupt_handler(libc::SIGTERM);
        assert!(flag().swap(false, Ordering::Relaxed));
        assert!(!flag().load(Ordering::Relaxed));
    }
}
