// SPDX-License-Identifier: MIT
//
// Input decoders.
//
// Three byte formats arrive at the tools:
//
// - Keyboard command lines from stdin (`dq`, `sq`, a radius, a hex color),
//   one command per line. Lines can be split across reads, so the decoder
//   keeps the unterminated tail between calls.
// - Relative-motion packets from a PS/2-style mouse device (`/dev/input/mice`),
//   three bytes each: button mask, signed dx, signed dy.
// - Linux evdev `input_event` records from a keyboard device, used by the
//   screenshot listener to spot PrintScreen and F5.
//
// All three are pure functions over byte slices. Absence of data is never
// an error, and malformed input is dropped rather than reported.

use bitflags::bitflags;
use fb_image::Rgb;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A text command typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `dq`: quit without writing the canvas.
    Discard,
    /// `sq`: write the canvas and quit.
    Save,
    /// A positive integer: new brush radius.
    Radius(u32),
    /// A six-digit hex color: new brush color.
    Color(Rgb),
}

bitflags! {
    /// Button state carried in byte 0 of a mouse packet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Buttons: u8 {
        const LEFT   = 0b0000_0001;
        const RIGHT  = 0b0000_0010;
        const MIDDLE = 0b0000_0100;
    }
}

/// One decoded relative-motion packet.
///
/// `dy` is already flipped so that positive means down the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerPacket {
    pub buttons: Buttons,
    pub dx: i32,
    pub dy: i32,
}

impl PointerPacket {
    /// Whether the primary (painting) button is held.
    #[inline]
    #[must_use]
    pub const fn primary(self) -> bool {
        self.buttons.contains(Buttons::LEFT)
    }
}

/// Anything the paint loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Command(Command),
    Pointer(PointerPacket),
}

// ─── Command Lines ──────────────────────────────────────────────────────────

/// Parse a single command line.
///
/// Returns `None` for anything unrecognized, including `0`, negative
/// numbers and malformed colors. A positive decimal number is a radius even
/// when it is six digits long; `000000` is not positive and so is black.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "" => None,
        "dq" => Some(Command::Discard),
        "sq" => Some(Command::Save),
        _ => match line.parse::<u32>() {
            Ok(n) if n > 0 && line.bytes().all(|b| b.is_ascii_digit()) => {
                Some(Command::Radius(n))
            }
            _ => Rgb::from_hex(line).map(Command::Color),
        },
    }
}

/// Incremental line splitter for keyboard input.
#[derive(Debug, Default)]
pub struct CommandDecoder {
    pending: Vec<u8>,
}

/// Longest unterminated line we keep. Anything longer is not a command.
const MAX_LINE: usize = 256;

impl CommandDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw keyboard bytes; return the commands completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Command> {
        let mut out = Vec::new();
        for &b in bytes {
            if b == b'\n' {
                if let Ok(line) = std::str::from_utf8(&self.pending) {
                    out.extend(parse_command(line));
                }
                self.pending.clear();
            } else if self.pending.len() < MAX_LINE {
                self.pending.push(b);
            }
        }
        out
    }

    /// Bytes received since the last newline.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}

// ─── Pointer Packets ────────────────────────────────────────────────────────

/// Size of one relative-motion packet.
pub const PACKET_LEN: usize = 3;

/// Decoder for 3-byte relative-motion packets.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerDecoder;

impl PointerDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode every whole packet in `bytes`.
    ///
    /// A trailing fragment shorter than a packet is dropped.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> Vec<PointerPacket> {
        bytes
            .chunks_exact(PACKET_LEN)
            .map(|p| PointerPacket {
                buttons: Buttons::from_bits_truncate(p[0]),
                dx: i32::from(i8::from_ne_bytes([p[1]])),
                dy: -i32::from(i8::from_ne_bytes([p[2]])),
            })
            .collect()
    }
}

// ─── Evdev Keys ─────────────────────────────────────────────────────────────

/// `EV_KEY` event type.
pub const EV_KEY: u16 = 0x01;
/// PrintScreen on PC keyboards (shares the key with SysRq).
pub const KEY_SYSRQ: u16 = 99;
/// Dedicated Print key.
pub const KEY_PRINT: u16 = 210;
/// F5 key code.
pub const KEY_F5: u16 = 63;

/// Bytes in the `struct timeval` that prefixes every `input_event`.
const TIMEVAL_LEN: usize = 2 * std::mem::size_of::<std::ffi::c_long>();

/// Size of one `struct input_event` on this platform.
pub const EVENT_LEN: usize = TIMEVAL_LEN + 8;

/// A key going down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: u16,
}

/// Decode evdev records, keeping only key presses.
///
/// Releases (value 0), autorepeat (value 2) and non-key events are
/// skipped, as is a trailing partial record.
#[must_use]
pub fn decode_key_events(bytes: &[u8]) -> Vec<KeyPress> {
    bytes
        .chunks_exact(EVENT_LEN)
        .filter_map(|rec| {
            let rest = &rec[TIMEVAL_LEN..];
            let kind = u16::from_ne_bytes([rest[0], rest[1]]);
            let code = u16::from_ne_bytes([rest[2], rest[3]]);
            let value = i32::from_ne_bytes([rest[4], rest[5], rest[6], rest[7]]);
            (kind == EV_KEY && value == 1).then_some(KeyPress { code })
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
