// SPDX-License-Identifier: MIT
//
// Console mode for the paint session, with RAII cleanup.
//
// Safety: This module uses `unsafe` for termios (tcgetattr, tcsetattr),
// fcntl, isatty and a raw fd write in the panic hook. These are the POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// While painting, the console must not echo what the user types (the echo
// would land on top of the framebuffer image) and reads from stdin must
// never block the loop. Canonical mode stays on: commands arrive as whole
// lines, which is exactly the unit the command decoder wants.
//
// `enter` saves the original termios and file status flags, turns echo off,
// sets O_NONBLOCK and hides the text cursor. `leave` undoes all of it and is
// idempotent; `Drop` calls it. If the process panics in between, a hook
// restores termios and shows the cursor before the panic message prints.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::debug;

const CURSOR_HIDE: &[u8] = b"\x1b[?25l";
const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

/// Check whether stdin is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Copy of the original termios for the panic hook, which cannot reach the
/// `Terminal` value.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Show the cursor with a raw write, bypassing the stdout lock the
/// panicking thread may hold.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            CURSOR_SHOW.as_ptr().cast::<libc::c_void>(),
            CURSOR_SHOW.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(CURSOR_SHOW);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Console handle. Restores the original mode on drop.
///
/// ```no_run
/// use fb_term::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... poll input, paint ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// `fcntl(F_GETFL)` flags of stdin before we added O_NONBLOCK.
    #[cfg(unix)]
    original_flags: Option<libc::c_int>,

    active: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// Create a handle without touching the console.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            #[cfg(unix)]
            original_flags: None,
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Turn echo off, make stdin non-blocking and hide the cursor.
    ///
    /// Idempotent. When stdin is not a terminal the termios step is
    /// skipped, which keeps pipes and tests working.
    ///
    /// # Errors
    ///
    /// Returns an error if termios, fcntl or the cursor write fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.disable_echo()?;
        self.set_nonblocking()?;

        let mut out = io::stdout().lock();
        out.write_all(CURSOR_HIDE)?;
        out.flush()?;

        self.active = true;
        debug!("terminal entered paint mode");
        Ok(())
    }

    /// Put the console back the way [`enter`](Self::enter) found it.
    ///
    /// Idempotent. Every step is attempted even if an earlier one fails;
    /// the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor write, fcntl or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let shown = {
            let mut out = io::stdout().lock();
            out.write_all(CURSOR_SHOW).and_then(|()| out.flush())
        };
        let flags = self.restore_flags();
        let echo = self.restore_echo();

        debug!("terminal restored");
        shown.and(flags).and(echo)
    }

    // ── termios ─────────────────────────────────────────────────────

    #[cfg(unix)]
    fn disable_echo(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_lflag &= !(libc::ECHO | libc::ECHONL);

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_echo(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn restore_echo(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios.take() {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }
        }
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore_echo(&mut self) -> io::Result<()> {
        Ok(())
    }

    // ── O_NONBLOCK ──────────────────────────────────────────────────

    #[cfg(unix)]
    fn set_nonblocking(&mut self) -> io::Result<()> {
        let flags = unsafe { libc::fcntl(libc::STDIN_FILENO, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(libc::STDIN_FILENO, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
            return Err(io::Error::last_os_error());
        }
        self.original_flags = Some(flags);
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_nonblocking(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn restore_flags(&mut self) -> io::Result<()> {
        match self.original_flags.take() {
            Some(flags) if unsafe { libc::fcntl(libc::STDIN_FILENO, libc::F_SETFL, flags) } < 0 => {
                Err(io::Error::last_os_error())
            }
            _ => Ok(()),
        }
    }

    #[cfg(not(unix))]
    fn restore_flags(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
