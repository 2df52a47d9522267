//! The paint event loop.
//!
//! One iteration: sample the interrupt flag, wait up to one tick for input,
//! apply the events in arrival order. The flag is swapped back to `false`
//! when read, so one signal produces one save. The loop never saves or
//! touches the terminal itself; it only reports how the session should end
//! and leaves [`Session::close`] to the caller.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use fb_term::InputEvent;
use tracing::trace;

use crate::session::{Exit, Session};

/// Where input batches come from.
pub trait EventSource {
    /// Wait up to `timeout` and return whatever arrived, possibly nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying devices fail.
    fn next_batch(&mut self, timeout: Duration) -> io::Result<Vec<InputEvent>>;
}

#[cfg(unix)]
impl EventSource for fb_term::InputSources {
    fn next_batch(&mut self, timeout: Duration) -> io::Result<Vec<InputEvent>> {
        self.poll(timeout)
    }
}

/// Drive `session` until a quit command or an interrupt.
///
/// # Errors
///
/// Returns an error if `source` fails. The session is left as it was, so
/// the caller can still close it.
pub fn run<M, S>(
    session: &mut Session<M>,
    source: &mut S,
    interrupt: &AtomicBool,
    tick: Duration,
) -> io::Result<Exit>
where
    M: AsRef<[u8]> + AsMut<[u8]>,
    S: EventSource + ?Sized,
{
    loop {
        if interrupt.swap(false, Ordering::Relaxed) {
            return Ok(session.interrupt());
        }

        let batch = source.next_batch(tick)?;
        if !batch.is_empty() {
            trace!(events = batch.len(), "input batch");
        }
        for event in batch {
            if let Some(exit) = session.handle(event) {
                return Ok(exit);
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
