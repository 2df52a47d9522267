// SPDX-License-Identifier: MIT
//
// fb-term — the console side of fbtools.
//
// Everything between the user and the paint session that is not pixels:
// the terminal mode the session runs under (echo off, non-blocking stdin,
// hidden cursor, restored on drop or panic), the decoders that turn raw
// keyboard lines and mouse packets into events, the poller that waits on
// both descriptors at once, and the interrupt flag set from SIGINT/SIGTERM.
//
// The decoders in `input` are pure and work on byte slices, so they are
// tested without a terminal. Only `terminal`, `reader` and `signal` touch
// the OS.

pub mod input;
#[cfg(unix)]
pub mod reader;
#[cfg(unix)]
pub mod signal;
pub mod terminal;

pub use input::{
    Buttons, Command, CommandDecoder, InputEvent, KeyPress, PointerDecoder, PointerPacket,
    decode_key_events, parse_command,
};
#[cfg(unix)]
pub use reader::InputSources;
pub use terminal::Terminal;
