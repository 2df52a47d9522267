// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Two-descriptor input poller.
//
// The paint loop listens to stdin (command lines) and a pointer device
// (motion packets) at the same time. One `poll(2)` call waits on both with
// a timeout, so the loop sleeps when idle and still wakes within one tick
// to sample the interrupt flag. A signal landing during the wait makes
// `poll` return EINTR, which we report as an empty batch.
//
// Within one batch, keyboard events come before pointer events.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, trace};

use crate::input::{CommandDecoder, InputEvent, PointerDecoder};

/// Read size for either descriptor. A pointer burst is a few packets, a
/// command line a few bytes.
const READ_BUF_SIZE: usize = 4096;

/// Keyboard plus pointer, waited on together.
pub struct InputSources {
    pointer: File,
    stdin_open: bool,
    commands: CommandDecoder,
    packets: PointerDecoder,
    buf: Vec<u8>,
}

impl InputSources {
    /// Open the pointer device non-blocking next to stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer device cannot be opened.
    pub fn open(pointer_path: &Path) -> io::Result<Self> {
        let pointer = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(pointer_path)?;
        debug!(pointer = %pointer_path.display(), "input sources open");
        Ok(Self::from_pointer(pointer))
    }

    /// Use an already open pointer descriptor.
    #[must_use]
    pub fn from_pointer(pointer: File) -> Self {
        Self {
            pointer,
            stdin_open: true,
            commands: CommandDecoder::new(),
            packets: PointerDecoder::new(),
            buf: vec![0; READ_BUF_SIZE],
        }
    }

    /// Whether stdin is still part of the wait set.
    #[inline]
    #[must_use]
    pub const fn stdin_open(&self) -> bool {
        self.stdin_open
    }

    /// Wait up to `timeout` for input and return what arrived.
    ///
    /// Keyboard events come first. An empty batch means timeout or an
    /// interrupted wait.
    ///
    /// # Errors
    ///
    /// Returns an error if `poll` or a read fails for any reason other
    /// than EINTR or EAGAIN, and `BrokenPipe` once the pointer device hangs
    /// up or reports an error condition.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Vec<InputEvent>> {
        let stdin_fd = io::stdin().as_raw_fd();
        let mut fds = [
            libc::pollfd {
                fd: self.pointer.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: stdin_fd,
                events: libc::POLLIN,
                revents: 0,
            },
        ];
        let nfds: libc::nfds_t = if self.stdin_open { 2 } else { 1 };
        let millis = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);

        let ready = unsafe { libc::poll(fds.as_mut_ptr(), nfds, millis) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                trace!("poll interrupted");
                return Ok(Vec::new());
            }
            return Err(err);
        }

        let mut events = Vec::new();
        if ready == 0 {
            return Ok(events);
        }

        let [pointer_fd, stdin_pfd] = fds;

        if self.stdin_open && stdin_pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0 {
            match read_ready(stdin_fd, &mut self.buf)? {
                Some(0) => {
                    debug!("stdin closed; listening to the pointer only");
                    self.stdin_open = false;
                }
                Some(n) => events.extend(
                    self.commands
                        .feed(&self.buf[..n])
                        .into_iter()
                        .map(InputEvent::Command),
                ),
                None => {}
            }
        }

        if pointer_fd.revents & libc::POLLIN != 0 {
            match read_ready(pointer_fd.fd, &mut self.buf)? {
                Some(0) => return Err(pointer_gone()),
                Some(n) => events.extend(
                    self.packets
                        .decode(&self.buf[..n])
                        .into_iter()
                        .map(InputEvent::Pointer),
                ),
                None => {}
            }
        } else if pointer_fd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
            // Would report ready again on every call.
            return Err(pointer_gone());
        }

        Ok(events)
    }
}

fn pointer_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "pointer device hung up")
}

/// One `read` on a descriptor poll reported ready.
///
/// `Some(0)` is EOF, `None` means nothing was there after all.
fn read_ready(fd: RawFd, buf: &mut [u8]) -> io::Result<Option<usize>> {
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        return match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
            _ => Err(err),
        };
    }
    #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
    Ok(Some(n as usize))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
